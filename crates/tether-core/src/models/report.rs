use serde::{Deserialize, Serialize};

use crate::models::candidate::Decision;
use crate::models::record::RecordRef;

/// Decision distribution over a batch of pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionCounts {
    pub auto_confirm: usize,
    pub manual_review: usize,
    pub no_match: usize,
}

impl DecisionCounts {
    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::AutoConfirm => self.auto_confirm += 1,
            Decision::ManualReview => self.manual_review += 1,
            Decision::NoMatch => self.no_match += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.auto_confirm + self.manual_review + self.no_match
    }
}

/// A pair whose decision would change under a proposed threshold config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionChange {
    pub source_ref: RecordRef,
    pub target_ref: RecordRef,
    pub aggregate_score: f64,
    /// Decision under the currently committed config.
    pub committed: Decision,
    /// Decision under the proposed config.
    pub proposed: Decision,
}

/// A per-pair evaluation failure collected into a batch report.
///
/// Batches have partial-failure semantics: one bad record is reported here
/// and does not abort or retry the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairError {
    pub source_ref: RecordRef,
    pub target_ref: RecordRef,
    pub reason: String,
}

/// Output of a side-effect-free tuning simulation.
///
/// A cancelled run is still a valid report over the pairs evaluated so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub evaluated: usize,
    /// Distribution under the proposed config.
    pub proposed_counts: DecisionCounts,
    /// Distribution under the committed config, for comparison.
    pub committed_counts: DecisionCounts,
    pub changes: Vec<DecisionChange>,
    pub errors: Vec<PairError>,
    /// Pairs excluded before scoring (e.g. deactivated sources).
    pub skipped: usize,
    pub cancelled: bool,
}

/// Outcome of a committing correlation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub evaluated: usize,
    pub counts: DecisionCounts,
    pub links_committed: usize,
    pub cases_opened: usize,
    pub skipped_deactivated: usize,
    pub errors: Vec<PairError>,
    pub cancelled: bool,
    /// True when the run executed under tuning mode and committed nothing.
    pub tuning_mode: bool,
}
