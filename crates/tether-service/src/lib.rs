//! # tether-service
//!
//! The operational surface of the correlation engine: rule CRUD with
//! snapshot republishing, expression validation with dry-run probes,
//! threshold tuning, case resolution, and the committing/simulating
//! correlation runs. Generic over the storage backend.

pub mod correlation;
pub mod expressions;
pub mod rules;
pub mod snapshots;
pub mod thresholds;

use std::sync::Arc;

use tether_cases::CaseManager;
use tether_core::traits::CorrelationStore;

pub use correlation::CorrelationRunner;
pub use expressions::{validate_expression, ExpressionProbe};
pub use rules::{RulePatch, RuleService};
pub use snapshots::SnapshotCache;
pub use thresholds::ThresholdService;

// Callers hand pairs to the runner in the engine's shape.
pub use tether_engine::RecordPair;

/// Everything a caller needs, wired over one shared store and one shared
/// snapshot cache, so a rule mutation is visible to the next run.
pub struct CorrelationService<S: CorrelationStore> {
    pub rules: RuleService<S>,
    pub thresholds: ThresholdService<S>,
    pub cases: CaseManager<S>,
    pub runner: CorrelationRunner<S>,
}

impl<S: CorrelationStore> CorrelationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        let snapshots = Arc::new(SnapshotCache::new());
        Self {
            rules: RuleService::new(Arc::clone(&store), Arc::clone(&snapshots)),
            thresholds: ThresholdService::new(Arc::clone(&store)),
            cases: CaseManager::new(Arc::clone(&store)),
            runner: CorrelationRunner::new(store, snapshots),
        }
    }
}
