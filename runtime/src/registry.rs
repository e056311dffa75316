//! In-memory implementation of the system manager's module table.

use nfa_core::registry::{ModuleId, ModuleTeardown, RegistryError, SystemRegistry};
use std::sync::{Arc, Mutex, PoisonError};

/// Table of registered modules and their teardown hooks
///
/// Registration order is kept so that [`ModuleRegistry::disable_all`] can tear
/// modules down newest first.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Mutex<Vec<(ModuleId, Arc<dyn ModuleTeardown>)>>,
}

impl ModuleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all registered modules, in registration order
    #[must_use]
    pub fn registered(&self) -> Vec<ModuleId> {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    /// Tear down every registered module, newest first
    ///
    /// The table is emptied before any hook runs, so hooks may call back into
    /// the registry (e.g. to deregister themselves).
    pub fn disable_all(&self) {
        let modules = std::mem::take(
            &mut *self.modules.lock().unwrap_or_else(PoisonError::into_inner),
        );

        for (id, teardown) in modules.into_iter().rev() {
            tracing::debug!(module = %id, "Disabling module");
            teardown.teardown();
        }
    }
}

impl SystemRegistry for ModuleRegistry {
    fn register(
        &self,
        id: ModuleId,
        teardown: Arc<dyn ModuleTeardown>,
    ) -> Result<(), RegistryError> {
        let mut modules = self.modules.lock().unwrap_or_else(PoisonError::into_inner);
        if modules.iter().any(|(existing, _)| *existing == id) {
            tracing::warn!(module = %id, "Module already registered");
            return Err(RegistryError::AlreadyRegistered(id));
        }
        tracing::debug!(module = %id, "Module registered");
        modules.push((id, teardown));
        Ok(())
    }

    fn deregister(&self, id: ModuleId) -> bool {
        let mut modules = self.modules.lock().unwrap_or_else(PoisonError::into_inner);
        let before = modules.len();
        modules.retain(|(existing, _)| *existing != id);
        let removed = modules.len() != before;
        if removed {
            tracing::debug!(module = %id, "Module deregistered");
        }
        removed
    }

    fn is_registered(&self, id: ModuleId) -> bool {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(existing, _)| *existing == id)
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    struct Recorder {
        id: ModuleId,
        log: Arc<Mutex<Vec<ModuleId>>>,
    }

    impl ModuleTeardown for Recorder {
        fn teardown(&self) {
            self.log.lock().unwrap().push(self.id);
        }
    }

    fn recorder(id: ModuleId, log: &Arc<Mutex<Vec<ModuleId>>>) -> Arc<dyn ModuleTeardown> {
        Arc::new(Recorder {
            id,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = ModuleRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(ModuleId::Wlc, recorder(ModuleId::Wlc, &log)).unwrap();
        assert_eq!(
            registry.register(ModuleId::Wlc, recorder(ModuleId::Wlc, &log)),
            Err(RegistryError::AlreadyRegistered(ModuleId::Wlc))
        );
        assert_eq!(registry.registered(), vec![ModuleId::Wlc]);
    }

    #[test]
    fn deregister_reports_whether_anything_was_removed() {
        let registry = ModuleRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(ModuleId::Rw, recorder(ModuleId::Rw, &log)).unwrap();
        assert!(registry.deregister(ModuleId::Rw));
        assert!(!registry.deregister(ModuleId::Rw));
        assert!(!registry.is_registered(ModuleId::Rw));
    }

    #[test]
    fn disable_all_runs_teardowns_newest_first() {
        let registry = ModuleRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(ModuleId::Dm, recorder(ModuleId::Dm, &log)).unwrap();
        registry.register(ModuleId::Rw, recorder(ModuleId::Rw, &log)).unwrap();
        registry.register(ModuleId::Wlc, recorder(ModuleId::Wlc, &log)).unwrap();

        registry.disable_all();

        assert_eq!(
            *log.lock().unwrap(),
            vec![ModuleId::Wlc, ModuleId::Rw, ModuleId::Dm]
        );
        assert!(registry.registered().is_empty());
    }
}
