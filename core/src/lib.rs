//! # NFA Core
//!
//! Core traits and types shared by the application-layer modules of the NFC
//! stack (NFA).
//!
//! Every module is modelled as a reducer hosted on the stack's single worker:
//!
//! - **State**: the module's control block, owned by the worker
//! - **Action**: every request or notification the module can receive
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a side effect description, executed by the runtime
//! - **Environment**: the collaborating modules, injected via traits
//!
//! ## Example
//!
//! ```ignore
//! use nfa_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for PresenceReducer {
//!     type State = PresenceState;
//!     type Action = PresenceAction;
//!     type Environment = PresenceEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PresenceState,
//!         action: PresenceAction,
//!         env: &PresenceEnvironment,
//!     ) -> SmallVec<[Effect; 4]> {
//!         state.checks += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for module logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for module logic
    ///
    /// A reducer receives exclusive access to its state for the duration of
    /// one call. The runtime never runs two reductions of the same store
    /// concurrently, so state needs no interior locking.
    ///
    /// # Type Parameters
    ///
    /// - `State`: The control block this reducer operates on
    /// - `Action`: The request/notification type this reducer processes
    /// - `Environment`: The injected collaborators this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime, in order
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned by reducers. The runtime executes them on the
/// worker, in the order they were returned, before the next action is taken
/// off the queue.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects never produce actions. A module that needs to react to the
    /// outcome of a side effect receives it as a notification from the
    /// module that owns the side effect.
    pub enum Effect {
        /// No-op effect
        None,

        /// Arbitrary async computation, awaited on the worker
        Future(Pin<Box<dyn Future<Output = ()> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl std::fmt::Debug for Effect {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl Effect {
        /// Wrap a synchronous side effect
        ///
        /// The closure runs on the worker when the effect is executed, not when
        /// the effect is built.
        #[must_use]
        pub fn call<F>(f: F) -> Self
        where
            F: FnOnce() + Send + 'static,
        {
            Effect::Future(Box::pin(async move { f() }))
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Module registry - how modules announce themselves to the system manager
pub mod registry {
    use std::sync::Arc;
    use thiserror::Error;

    /// Identifiers of the NFA sub-systems that can register with the system
    /// manager
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum ModuleId {
        /// System manager
        Sys,
        /// Device manager (discovery, RF interface handling)
        Dm,
        /// Execution environment management
        Ee,
        /// Reader/writer
        Rw,
        /// Card emulation
        Ce,
        /// Host controller interface
        Hci,
        /// Wireless charging
        Wlc,
    }

    impl std::fmt::Display for ModuleId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let name = match self {
                Self::Sys => "SYS",
                Self::Dm => "DM",
                Self::Ee => "EE",
                Self::Rw => "RW",
                Self::Ce => "CE",
                Self::Hci => "HCI",
                Self::Wlc => "WLC",
            };
            f.write_str(name)
        }
    }

    /// Errors returned by a [`SystemRegistry`]
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum RegistryError {
        /// The module id is already taken
        #[error("module {0} is already registered")]
        AlreadyRegistered(ModuleId),
    }

    /// Hook invoked when the system manager disables a module
    pub trait ModuleTeardown: Send + Sync {
        /// Release the module. Called at most once per registration.
        fn teardown(&self);
    }

    /// Module registration interface of the system manager
    pub trait SystemRegistry: Send + Sync {
        /// Register a module with its teardown hook
        ///
        /// # Errors
        ///
        /// Returns [`RegistryError::AlreadyRegistered`] if `id` is taken.
        fn register(
            &self,
            id: ModuleId,
            teardown: Arc<dyn ModuleTeardown>,
        ) -> Result<(), RegistryError>;

        /// Remove a registration. Returns true if the module was registered.
        fn deregister(&self, id: ModuleId) -> bool;

        /// Returns true if `id` is currently registered
        fn is_registered(&self, id: ModuleId) -> bool;
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::registry::ModuleId;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn call_effect_runs_when_awaited() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let effect = Effect::call(move || flag.store(true, Ordering::SeqCst));
        assert!(!ran.load(Ordering::SeqCst));

        let Effect::Future(fut) = effect else {
            unreachable!("call always builds a future effect");
        };
        futures::executor::block_on(fut);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn none_is_none() {
        assert!(Effect::None.is_none());
        assert!(!Effect::call(|| ()).is_none());
    }

    #[test]
    fn module_ids_display_short_names() {
        assert_eq!(ModuleId::Wlc.to_string(), "WLC");
        assert_eq!(ModuleId::Rw.to_string(), "RW");
    }
}
