//! One pair through the pipeline: snapshot -> aggregate -> decide.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use tether_core::{MatchCandidate, Record, ThresholdConfig};

use crate::aggregate::aggregate;
use crate::policy::decide;
use crate::snapshot::RuleSnapshot;

/// Score and classify one candidate pair.
///
/// Pure apart from id/timestamp generation; commits nothing. Callers decide
/// what to do with the candidate (commit a link, open a case, or just
/// record it during tuning).
pub fn correlate_pair(
    snapshot: &RuleSnapshot,
    config: &ThresholdConfig,
    source: &Record,
    target: &Record,
) -> MatchCandidate {
    let agg = aggregate(snapshot, source, target);
    let decision = decide(agg.score, agg.definitive_hit, config);

    debug!(
        source = %source.record_ref,
        target = %target.record_ref,
        score = agg.score,
        definitive = agg.definitive_hit,
        decision = decision.as_str(),
        snapshot_version = snapshot.version(),
        "scored candidate pair"
    );

    MatchCandidate {
        id: Uuid::new_v4().to_string(),
        source_ref: source.record_ref.clone(),
        target_ref: target.record_ref.clone(),
        aggregate_score: agg.score,
        definitive_hit: agg.definitive_hit,
        no_rules: agg.no_rules,
        rule_hits: agg.hits,
        decision,
        evaluated_at: Utc::now(),
    }
}
