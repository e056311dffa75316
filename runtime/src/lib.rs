//! # NFA Runtime
//!
//! The message bus that hosts NFA modules.
//!
//! ## Core Components
//!
//! - **Store**: one worker task per module that exclusively owns the module
//!   state and processes queued actions strictly in arrival order
//! - **Mailbox**: a bounded queue; callers on any thread enqueue without
//!   blocking, and a full queue is reported as resource exhaustion
//! - **`ModuleRegistry`**: the system manager's table of registered modules and
//!   their teardown hooks
//!
//! ## Example
//!
//! ```ignore
//! use nfa_runtime::{Store, StoreConfig};
//!
//! let store = Store::spawn(initial_state, my_reducer, environment, StoreConfig::default());
//!
//! // Hand a request to the worker (never blocks)
//! store.enqueue(Action::DoSomething)?;
//!
//! // Read state on the worker, after everything queued so far
//! let value = store.state(|s| s.some_field).await?;
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Module registration table of the system manager
pub mod registry;

/// Metric descriptions for the runtime and hosted modules
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The mailbox is full; the action was not queued
        ///
        /// This is the bus-level resource exhaustion condition. No part of
        /// the action has been executed.
        #[error("Store queue is full (capacity {0})")]
        QueueFull(usize),

        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for the worker to drain its queue
        #[error("Shutdown timed out after {0:?}")]
        ShutdownTimeout(std::time::Duration),

        /// The worker is gone, typically because the store has shut down
        #[error("Store worker channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use registry::ModuleRegistry;
pub use store::Store;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default()
///     .with_queue_capacity(16)
///     .with_shutdown_timeout(Duration::from_secs(1));
///
/// let store = Store::spawn(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of queued, not yet processed actions
    pub queue_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(queue_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            queue_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the mailbox capacity
    ///
    /// A capacity of zero is raised to one; tokio channels need room for at
    /// least one message.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            default_shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Store module - the worker that hosts one reducer
pub mod store {
    use super::{Arc, Duration, Mutex, StoreConfig, StoreError};
    use nfa_core::{effect::Effect, reducer::Reducer};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::mpsc::error::TrySendError;
    use tokio::sync::{mpsc, oneshot};
    use tokio::task::JoinHandle;

    type Inspector<S> = Box<dyn FnOnce(&S) + Send>;

    /// Messages travelling through the mailbox
    enum Envelope<S, A> {
        Action(A),
        Inspect(Inspector<S>),
        Stop,
    }

    /// The Store - a single-worker message bus for one reducer
    ///
    /// The worker task owns the state. Handles only hold the sending half of
    /// the mailbox, so no handle can touch the state directly; the only read
    /// path is [`Store::state`], which runs on the worker.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    pub struct Store<S, A> {
        sender: mpsc::Sender<Envelope<S, A>>,
        accepting: Arc<AtomicBool>,
        capacity: usize,
        worker: Arc<Mutex<Option<JoinHandle<()>>>>,
        shutdown_timeout: Duration,
    }

    impl<S, A> Store<S, A>
    where
        S: Send + 'static,
        A: Send + std::fmt::Debug + 'static,
    {
        /// Create a store with default configuration
        ///
        /// Must be called from within a tokio runtime.
        #[must_use]
        pub fn new<R, E>(initial_state: S, reducer: R, environment: E) -> Self
        where
            R: Reducer<State = S, Action = A, Environment = E> + Send + 'static,
            E: Send + 'static,
        {
            Self::spawn(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Spawn the worker task and return a handle to it
        ///
        /// Must be called from within a tokio runtime.
        #[must_use]
        pub fn spawn<R, E>(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self
        where
            R: Reducer<State = S, Action = A, Environment = E> + Send + 'static,
            E: Send + 'static,
        {
            let capacity = config.queue_capacity.max(1);
            let (sender, receiver) = mpsc::channel(capacity);

            let worker = Worker {
                state: initial_state,
                reducer,
                environment,
                _action: std::marker::PhantomData,
            };
            let handle = tokio::spawn(worker.run(receiver));

            tracing::debug!(capacity, "Store worker started");

            Self {
                sender,
                accepting: Arc::new(AtomicBool::new(true)),
                capacity,
                worker: Arc::new(Mutex::new(Some(handle))),
                shutdown_timeout: config.default_shutdown_timeout,
            }
        }

        /// Queue an action for the worker without waiting
        ///
        /// Safe to call from any thread, inside or outside the runtime.
        ///
        /// # Errors
        ///
        /// - [`StoreError::QueueFull`] if the mailbox has no free slot
        /// - [`StoreError::ShutdownInProgress`] if the store no longer accepts actions
        pub fn enqueue(&self, action: A) -> Result<(), StoreError> {
            if !self.accepting.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.queue.rejected", "reason" => "shutdown").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            match self.sender.try_send(Envelope::Action(action)) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(capacity = self.capacity, "Rejected action: queue full");
                    metrics::counter!("store.queue.rejected", "reason" => "full").increment(1);
                    Err(StoreError::QueueFull(self.capacity))
                },
                Err(TrySendError::Closed(_)) => Err(StoreError::ShutdownInProgress),
            }
        }

        /// Queue an action, waiting for a free slot if the mailbox is full
        ///
        /// For messages that must not be lost to a full queue. Waiters are
        /// served in the order they started waiting.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store no longer
        /// accepts actions.
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if !self.accepting.load(Ordering::Acquire) {
                return Err(StoreError::ShutdownInProgress);
            }
            self.sender
                .send(Envelope::Action(action))
                .await
                .map_err(|_| StoreError::ShutdownInProgress)
        }

        /// Read state via a closure, on the worker
        ///
        /// The closure runs after every action queued before this call has
        /// been processed (including its effects).
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ChannelClosed`] if the worker has stopped.
        pub async fn state<F, T>(&self, f: F) -> Result<T, StoreError>
        where
            F: FnOnce(&S) -> T + Send + 'static,
            T: Send + 'static,
        {
            let (tx, rx) = oneshot::channel();
            let inspect: Inspector<S> = Box::new(move |state| {
                let _ = tx.send(f(state));
            });

            self.sender
                .send(Envelope::Inspect(inspect))
                .await
                .map_err(|_| StoreError::ChannelClosed)?;

            rx.await.map_err(|_| StoreError::ChannelClosed)
        }

        /// Returns true while the store accepts new actions
        #[must_use]
        pub fn is_accepting(&self) -> bool {
            self.accepting.load(Ordering::Acquire)
        }

        /// Stop accepting actions, drain the queue and stop the worker
        ///
        /// Actions queued before the call are still processed.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the worker has not
        /// drained its queue within `timeout`.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating store shutdown");
            self.accepting.store(false, Ordering::Release);

            let handle = self
                .worker
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .take();
            let Some(handle) = handle else {
                return Ok(());
            };

            let drained = async {
                // The worker may already be gone; the join below covers it.
                let _ = self.sender.send(Envelope::Stop).await;
                let _ = handle.await;
            };

            tokio::time::timeout(timeout, drained)
                .await
                .map_err(|_| {
                    tracing::error!(?timeout, "Store shutdown timed out");
                    StoreError::ShutdownTimeout(timeout)
                })?;

            tracing::info!("Store shutdown complete");
            Ok(())
        }

        /// [`Store::shutdown`] with the configured default timeout
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] on expiry.
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.shutdown_timeout).await
        }
    }

    impl<S, A> Clone for Store<S, A> {
        fn clone(&self) -> Self {
            Self {
                sender: self.sender.clone(),
                accepting: Arc::clone(&self.accepting),
                capacity: self.capacity,
                worker: Arc::clone(&self.worker),
                shutdown_timeout: self.shutdown_timeout,
            }
        }
    }

    impl<S, A> std::fmt::Debug for Store<S, A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("capacity", &self.capacity)
                .field("accepting", &self.accepting.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }

    /// The worker side of a store
    struct Worker<S, A, E, R> {
        state: S,
        reducer: R,
        environment: E,
        _action: std::marker::PhantomData<fn(A)>,
    }

    impl<S, A, E, R> Worker<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: std::fmt::Debug,
    {
        async fn run(mut self, mut receiver: mpsc::Receiver<Envelope<S, A>>) {
            while let Some(envelope) = receiver.recv().await {
                match envelope {
                    Envelope::Action(action) => self.process(action).await,
                    Envelope::Inspect(inspect) => inspect(&self.state),
                    Envelope::Stop => {
                        receiver.close();
                        break;
                    },
                }
            }
            tracing::debug!("Store worker stopped");
        }

        /// Reduce one action and execute its effects before returning
        #[tracing::instrument(skip_all, name = "store_process")]
        async fn process(&mut self, action: A) {
            tracing::trace!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                Self::execute(effect).await;
            }
        }

        async fn execute(effect: Effect) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    fut.await;
                },
            }
        }
    }
}
