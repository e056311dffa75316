//! Module lifecycle: init, registration with the system manager, disable.

use crate::actions::WlcAction;
use crate::api::{WlcApi, WlcNotifier, WlcStore};
use crate::config::WlcConfig;
use crate::environment::WlcEnvironment;
use crate::error::WlcError;
use crate::reducer::WlcReducer;
use crate::state::{DisableSignal, WlcState};
use nfa_core::registry::{ModuleId, ModuleTeardown, SystemRegistry};
use nfa_runtime::{Store, StoreError};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Disables the module; registered with the system manager as its teardown
struct WlcTeardown {
    store: WlcStore,
    signal: DisableSignal,
    runtime: Handle,
}

impl WlcTeardown {
    /// Raise the disable signal, then queue `Disable` for the worker
    ///
    /// Never fails and never blocks. With a full queue the `Disable` message
    /// is handed to a task that waits for a free slot; the raised signal
    /// already keeps the worker from handling anything else in the meantime.
    fn disable(&self) {
        self.signal.raise();

        match self.store.enqueue(WlcAction::Disable) {
            Ok(()) => {},
            Err(StoreError::QueueFull(capacity)) => {
                tracing::debug!(capacity, "WLC queue full, deferring disable");
                metrics::counter!("wlc.disable.deferred").increment(1);

                let store = self.store.clone();
                self.runtime.spawn(async move {
                    if let Err(error) = store.send(WlcAction::Disable).await {
                        tracing::debug!(%error, "WLC worker stopped before disable was queued");
                    }
                });
            },
            Err(error) => tracing::debug!(%error, "WLC worker already stopping"),
        }
    }
}

impl ModuleTeardown for WlcTeardown {
    fn teardown(&self) {
        self.disable();
    }
}

/// A running WLC module
///
/// Owns the worker hosting the control block and the module's registration.
pub struct WlcModule {
    store: WlcStore,
    registry: Arc<dyn SystemRegistry>,
    teardown: Arc<WlcTeardown>,
}

impl WlcModule {
    /// Start the worker and register the module
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`WlcError::Registry`] if a WLC module is already registered.
    pub fn init(
        env: WlcEnvironment,
        registry: Arc<dyn SystemRegistry>,
        config: &WlcConfig,
    ) -> Result<Self, WlcError> {
        tracing::debug!(?config, "Initializing WLC module");

        let signal = DisableSignal::new();
        let reducer = WlcReducer::new()
            .with_start_failure_reports(config.report_start_failures)
            .with_disable_signal(signal.clone());
        let store = Store::spawn(WlcState::default(), reducer, env, config.store_config());

        let teardown = Arc::new(WlcTeardown {
            store: store.clone(),
            signal,
            runtime: Handle::current(),
        });
        registry.register(ModuleId::Wlc, teardown.clone())?;

        Ok(Self {
            store,
            registry,
            teardown,
        })
    }

    /// Request dispatcher for callers
    #[must_use]
    pub fn api(&self) -> WlcApi {
        WlcApi::new(self.store.clone())
    }

    /// Notification handle for the device manager
    #[must_use]
    pub fn notifier(&self) -> WlcNotifier {
        WlcNotifier::new(self.store.clone())
    }

    /// Read the control block on the worker
    ///
    /// Runs after every request queued before the call has been handled.
    ///
    /// # Errors
    ///
    /// [`WlcError::ShutdownInProgress`] if the worker has stopped.
    pub async fn inspect<F, T>(&self, f: F) -> Result<T, WlcError>
    where
        F: FnOnce(&WlcState) -> T + Send + 'static,
        T: Send + 'static,
    {
        Ok(self.store.state(f).await?)
    }

    /// Reset the control block and deregister
    ///
    /// Takes effect even when the queue is full: nothing reaching the worker
    /// afterwards is handled.
    pub fn disable(&self) {
        tracing::debug!("Disabling WLC module");
        self.teardown.disable();
        self.registry.deregister(ModuleId::Wlc);
    }

    /// Disable the module, then drain and stop the worker
    ///
    /// # Errors
    ///
    /// [`WlcError::ShutdownInProgress`] if the queue did not drain in time.
    pub async fn shutdown(&self) -> Result<(), WlcError> {
        self.disable();
        Ok(self.store.shutdown_default().await?)
    }
}

impl std::fmt::Debug for WlcModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WlcModule")
            .field("store", &self.store)
            .field("disabled", &self.teardown.signal.is_raised())
            .finish_non_exhaustive()
    }
}
