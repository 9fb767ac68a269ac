//! Per-scope snapshot cache shared between rule mutations and runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tether_core::errors::TetherResult;
use tether_core::traits::CorrelationStore;
use tether_core::RuleScope;
use tether_engine::{RuleSnapshot, SnapshotHandle};

/// Lazily-created `SnapshotHandle` per rule scope.
///
/// The cache only adds handles, never drops them: a scope with all rules
/// deleted keeps an empty snapshot, which scores every pair 0.0.
pub struct SnapshotCache {
    handles: RwLock<HashMap<String, Arc<SnapshotHandle>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// The handle for `scope`, creating an empty one on first use.
    pub fn handle(&self, scope: &RuleScope) -> Arc<SnapshotHandle> {
        let key = scope.key();
        {
            let guard = match self.handles.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(handle) = guard.get(&key) {
                return Arc::clone(handle);
            }
        }
        let mut guard = match self.handles.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            guard
                .entry(key)
                .or_insert_with(|| Arc::new(SnapshotHandle::new(scope.clone()))),
        )
    }

    /// The current snapshot for `scope` without touching storage.
    pub fn current(&self, scope: &RuleScope) -> Arc<RuleSnapshot> {
        self.handle(scope).current()
    }

    /// Reload the scope's active rules from the store and publish a new
    /// snapshot version.
    pub fn refresh<S: CorrelationStore>(
        &self,
        store: &S,
        scope: &RuleScope,
    ) -> TetherResult<Arc<RuleSnapshot>> {
        let rules = store.active_rules(scope)?;
        Ok(self.handle(scope).publish(rules))
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}
