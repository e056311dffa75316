//! Integration tests for the single-worker Store
//!
//! Covers the properties modules rely on: callers on any thread can enqueue,
//! the worker handles actions one at a time in arrival order, and every effect
//! of an action has run before the next action is reduced.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use nfa_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use nfa_runtime::{Store, StoreConfig, StoreError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, PartialEq)]
enum TestAction {
    Record { thread: usize, seq: u32 },
    Slow { id: u32 },
}

#[derive(Debug, Default)]
struct TestState {
    records: Vec<(usize, u32)>,
    reduced: Vec<u32>,
}

#[derive(Clone, Default)]
struct TestEnvironment {
    log: Arc<Mutex<Vec<String>>>,
}

struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect; 4]> {
        match action {
            TestAction::Record { thread, seq } => {
                state.records.push((thread, seq));
                smallvec![Effect::None]
            },
            TestAction::Slow { id } => {
                state.reduced.push(id);
                env.log.lock().unwrap().push(format!("reduce {id}"));
                let log = Arc::clone(&env.log);
                smallvec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    log.lock().unwrap().push(format!("effect {id}"));
                }))]
            },
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn enqueue_from_plain_threads_keeps_per_thread_order() {
    let config = StoreConfig::default().with_queue_capacity(1024);
    let store = Store::spawn(
        TestState::default(),
        TestReducer,
        TestEnvironment::default(),
        config,
    );

    let threads: Vec<_> = (0..4)
        .map(|thread| {
            let store = store.clone();
            std::thread::spawn(move || {
                for seq in 0..50 {
                    store.enqueue(TestAction::Record { thread, seq }).unwrap();
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    let records = store.state(|s| s.records.clone()).await.unwrap();
    assert_eq!(records.len(), 200);
    for thread in 0..4 {
        let seqs: Vec<u32> = records
            .iter()
            .filter(|(t, _)| *t == thread)
            .map(|(_, seq)| *seq)
            .collect();
        assert_eq!(seqs, (0..50).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn effects_finish_before_the_next_action_is_reduced() {
    let env = TestEnvironment::default();
    let log = Arc::clone(&env.log);
    let store = Store::new(TestState::default(), TestReducer, env);

    store.enqueue(TestAction::Slow { id: 1 }).unwrap();
    store.enqueue(TestAction::Slow { id: 2 }).unwrap();

    let reduced = store.state(|s| s.reduced.clone()).await.unwrap();
    assert_eq!(reduced, vec![1, 2]);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["reduce 1", "effect 1", "reduce 2", "effect 2"]
    );
}

#[tokio::test]
async fn send_waits_for_room_instead_of_failing() {
    let config = StoreConfig::default().with_queue_capacity(1);
    let store = Store::spawn(
        TestState::default(),
        TestReducer,
        TestEnvironment::default(),
        config,
    );

    store.enqueue(TestAction::Slow { id: 1 }).unwrap();
    assert_eq!(
        store.enqueue(TestAction::Slow { id: 2 }),
        Err(StoreError::QueueFull(1))
    );
    store.send(TestAction::Slow { id: 3 }).await.unwrap();

    let reduced = store.state(|s| s.reduced.clone()).await.unwrap();
    assert_eq!(reduced, vec![1, 3]);
}

#[tokio::test]
async fn shutdown_times_out_when_an_effect_hangs() {
    #[derive(Debug)]
    struct Hang;

    struct HangReducer;

    impl Reducer for HangReducer {
        type State = ();
        type Action = Hang;
        type Environment = ();

        fn reduce(&self, _: &mut (), _: Hang, _: &()) -> SmallVec<[Effect; 4]> {
            smallvec![Effect::Future(Box::pin(std::future::pending()))]
        }
    }

    let store = Store::new((), HangReducer, ());
    store.enqueue(Hang).unwrap();

    let timeout = Duration::from_millis(50);
    assert_eq!(
        store.shutdown(timeout).await,
        Err(StoreError::ShutdownTimeout(timeout))
    );
}
