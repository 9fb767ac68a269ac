//! Score aggregation: per-rule scores into one candidate confidence value.

use tether_core::{AggregateScore, Record, RuleHit};

use crate::snapshot::RuleSnapshot;

/// Aggregate all rules in a snapshot against one record pair.
///
/// Rules are walked in (tier, priority) order. A hit on a definitive rule
/// short-circuits immediately with score 1.0 — "these two attributes
/// matching is proof enough", weighting is bypassed entirely. Otherwise the
/// score is the weighted hit ratio `Σ weight(hits) / Σ weight(evaluated)`
/// over every evaluated rule, clamped to [0.0, 1.0].
///
/// Same-tier rules that disagree are treated as independently weighted
/// contributors; there is no unanimity requirement within a tier.
///
/// Edge cases: an empty active rule set yields 0.0 with the `no_rules` flag
/// set; an all-zero-weight rule set yields 0.0 without the flag. Neither
/// divides by zero.
pub fn aggregate(snapshot: &RuleSnapshot, source: &Record, target: &Record) -> AggregateScore {
    if snapshot.is_empty() {
        return AggregateScore::no_rules_configured();
    }

    let mut hits: Vec<RuleHit> = Vec::new();
    let mut hit_weight = 0.0_f64;
    let mut total_weight = 0.0_f64;

    for prepared in snapshot.rules() {
        let rule = prepared.rule();
        let result = prepared.score(source, target);
        total_weight += rule.weight;

        if result.hit {
            hits.push(RuleHit {
                rule_id: rule.id.clone(),
                score: result.score,
                tier: rule.tier,
                weight: rule.weight,
                definitive: rule.is_definitive,
            });
            hit_weight += rule.weight;

            if rule.is_definitive {
                return AggregateScore {
                    score: 1.0,
                    definitive_hit: true,
                    no_rules: false,
                    hits,
                };
            }
        }
    }

    let score = if total_weight > 0.0 {
        (hit_weight / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    AggregateScore {
        score,
        definitive_hit: false,
        no_rules: false,
        hits,
    }
}
