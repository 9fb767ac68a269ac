use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::record::RecordRef;

/// Outcome class for one scored pair.
///
/// Variants are ordered so that a higher aggregate score can never move the
/// decision backward: `NoMatch < ManualReview < AutoConfirm`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    NoMatch,
    ManualReview,
    AutoConfirm,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::ManualReview => "manual_review",
            Self::AutoConfirm => "auto_confirm",
        }
    }
}

/// One rule that hit during aggregation, kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule_id: String,
    /// Raw evaluator score, always >= the rule's threshold.
    pub score: f64,
    pub tier: u32,
    pub weight: f64,
    pub definitive: bool,
}

/// Aggregation output before the threshold policy is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    /// Weighted hit ratio, clamped to [0.0, 1.0].
    pub score: f64,
    /// A definitive rule hit; the score is forced to 1.0.
    pub definitive_hit: bool,
    /// The active rule set was empty. The score is defined as 0.0.
    pub no_rules: bool,
    /// Rules that hit, in (tier, priority) evaluation order.
    pub hits: Vec<RuleHit>,
}

impl AggregateScore {
    /// The empty-rule-set aggregate: 0.0 with the `no_rules` flag set.
    pub fn no_rules_configured() -> Self {
        Self {
            score: 0.0,
            definitive_hit: false,
            no_rules: true,
            hits: Vec::new(),
        }
    }
}

/// The output of one pairwise evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    pub source_ref: RecordRef,
    pub target_ref: RecordRef,
    pub aggregate_score: f64,
    pub definitive_hit: bool,
    /// True when no rules were configured for the scope.
    #[serde(default)]
    pub no_rules: bool,
    pub rule_hits: Vec<RuleHit>,
    pub decision: Decision,
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_ordering_matches_confidence() {
        assert!(Decision::NoMatch < Decision::ManualReview);
        assert!(Decision::ManualReview < Decision::AutoConfirm);
    }

    #[test]
    fn no_rules_aggregate_is_zero() {
        let agg = AggregateScore::no_rules_configured();
        assert_eq!(agg.score, 0.0);
        assert!(agg.no_rules);
        assert!(!agg.definitive_hit);
    }
}
