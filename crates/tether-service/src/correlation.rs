//! Correlation runs: the committing run and the tuning simulation.
//!
//! Both score in parallel per chunk. Only the committing run touches
//! storage, and only from the sequential side-effect phase — link commits
//! and case inserts for one chunk happen in order, after the chunk is
//! scored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use tether_cases::CaseManager;
use tether_core::errors::TetherResult;
use tether_core::traits::CorrelationStore;
use tether_core::{
    BatchOutcome, Decision, MatchCandidate, PairError, RuleScope, SimulationReport,
    ThresholdConfig,
};
use tether_engine::{correlate_pair, RecordPair, RuleSnapshot};

use crate::snapshots::SnapshotCache;

/// Committed-by marker for links the pipeline confirms automatically.
const PIPELINE_ACTOR: &str = "pipeline";

enum PairRun {
    Scored(Box<MatchCandidate>),
    Excluded,
    Cancelled,
    Failed(PairError),
}

pub struct CorrelationRunner<S: CorrelationStore> {
    store: Arc<S>,
    snapshots: Arc<SnapshotCache>,
    cases: CaseManager<S>,
}

impl<S: CorrelationStore> CorrelationRunner<S> {
    pub fn new(store: Arc<S>, snapshots: Arc<SnapshotCache>) -> Self {
        let cases = CaseManager::new(Arc::clone(&store));
        Self {
            store,
            snapshots,
            cases,
        }
    }

    /// Run correlation over `pairs` and commit the outcomes: auto-confirms
    /// become identity links, manual reviews become pending cases.
    ///
    /// Under `tuning_mode` the run still scores and counts everything but
    /// commits nothing. Cancellation is cooperative and chunk-granular for
    /// side effects; a cancelled run returns the partial outcome.
    pub fn run(
        &self,
        scope: &RuleScope,
        pairs: &[RecordPair],
        cancel: &AtomicBool,
    ) -> TetherResult<BatchOutcome> {
        let config = self.store.get_threshold(scope)?.unwrap_or_default();
        let snapshot = self.snapshots.refresh(self.store.as_ref(), scope)?;

        let mut outcome = BatchOutcome {
            tuning_mode: config.tuning_mode,
            ..Default::default()
        };

        for chunk in pairs.chunks(config.batch_size.max(1)) {
            if cancel.load(Ordering::Relaxed) {
                outcome.cancelled = true;
                break;
            }

            let scored: Vec<PairRun> = chunk
                .par_iter()
                .map(|pair| {
                    if cancel.load(Ordering::Relaxed) {
                        return PairRun::Cancelled;
                    }
                    score_pair(&snapshot, &config, pair)
                })
                .collect();

            for result in scored {
                match result {
                    PairRun::Scored(candidate) => {
                        outcome.evaluated += 1;
                        outcome.counts.record(candidate.decision);
                        if !config.tuning_mode {
                            self.commit(*candidate, &mut outcome)?;
                        }
                    }
                    PairRun::Excluded => outcome.skipped_deactivated += 1,
                    PairRun::Cancelled => outcome.cancelled = true,
                    PairRun::Failed(error) => outcome.errors.push(error),
                }
            }
        }

        info!(
            scope = %scope,
            evaluated = outcome.evaluated,
            links = outcome.links_committed,
            cases = outcome.cases_opened,
            errors = outcome.errors.len(),
            tuning_mode = outcome.tuning_mode,
            cancelled = outcome.cancelled,
            snapshot_version = snapshot.version(),
            "correlation run finished"
        );
        Ok(outcome)
    }

    /// Replay `pairs` under a proposed threshold config without writing
    /// anything. The committed config is the scope's stored one.
    pub fn simulate(
        &self,
        scope: &RuleScope,
        proposed: &ThresholdConfig,
        pairs: &[RecordPair],
        cancel: &AtomicBool,
    ) -> TetherResult<SimulationReport> {
        proposed.validate()?;
        let committed = self.store.get_threshold(scope)?.unwrap_or_default();
        let snapshot = self.snapshots.refresh(self.store.as_ref(), scope)?;
        Ok(tether_engine::simulate(
            &snapshot, proposed, &committed, pairs, cancel,
        ))
    }

    fn commit(&self, candidate: MatchCandidate, outcome: &mut BatchOutcome) -> TetherResult<()> {
        match candidate.decision {
            Decision::AutoConfirm => {
                let committed = self.store.commit_link(
                    &candidate.source_ref,
                    &candidate.target_ref,
                    PIPELINE_ACTOR,
                )?;
                if committed {
                    outcome.links_committed += 1;
                }
            }
            Decision::ManualReview => {
                let (_, created) = self.cases.open_case(candidate)?;
                if created {
                    outcome.cases_opened += 1;
                }
            }
            Decision::NoMatch => {}
        }
        Ok(())
    }
}

fn score_pair(
    snapshot: &RuleSnapshot,
    config: &ThresholdConfig,
    pair: &RecordPair,
) -> PairRun {
    if pair.source.record_ref == pair.target.record_ref {
        return PairRun::Failed(PairError {
            source_ref: pair.source.record_ref.clone(),
            target_ref: pair.target.record_ref.clone(),
            reason: "source and target are the same record".to_string(),
        });
    }
    if pair.source.deactivated && !config.include_deactivated {
        return PairRun::Excluded;
    }
    PairRun::Scored(Box::new(correlate_pair(
        snapshot,
        config,
        &pair.source,
        &pair.target,
    )))
}
