//! # NFA Testing
//!
//! Testing utilities for reducers hosted on the NFA runtime.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness that drives a reducer directly,
//!   without a worker task
//! - [`assertions`]: effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use nfa_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(PresenceReducer)
//!     .with_env(test_environment())
//!     .given_state(PresenceState::default())
//!     .when_action(PresenceAction::Check)
//!     .then_state(|state| assert_eq!(state.checks, 1))
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```


pub use reducer_test::{assertions, ReducerTest};
