//! Threshold decision policy.

use tether_core::{Decision, ThresholdConfig};

/// Map an aggregate score to a decision.
///
/// Pure and monotonic: raising the score never moves the decision backward.
/// A definitive hit auto-confirms unconditionally. Tuning mode does not
/// change the decision — it changes what the *caller* is allowed to commit.
pub fn decide(aggregate_score: f64, definitive_hit: bool, config: &ThresholdConfig) -> Decision {
    if definitive_hit {
        return Decision::AutoConfirm;
    }
    if aggregate_score >= config.auto_confirm_threshold {
        Decision::AutoConfirm
    } else if aggregate_score >= config.manual_review_threshold {
        Decision::ManualReview
    } else {
        Decision::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(auto: f64, manual: f64) -> ThresholdConfig {
        ThresholdConfig {
            auto_confirm_threshold: auto,
            manual_review_threshold: manual,
            ..Default::default()
        }
    }

    #[test]
    fn bands_are_inclusive_at_the_lower_edge() {
        let c = config(0.9, 0.3);
        assert_eq!(decide(0.9, false, &c), Decision::AutoConfirm);
        assert_eq!(decide(0.3, false, &c), Decision::ManualReview);
        assert_eq!(decide(0.29, false, &c), Decision::NoMatch);
    }

    #[test]
    fn definitive_hit_overrides_any_score() {
        let c = config(0.9, 0.3);
        assert_eq!(decide(0.0, true, &c), Decision::AutoConfirm);
    }

    #[test]
    fn equal_thresholds_collapse_the_review_band() {
        let c = config(0.5, 0.5);
        assert_eq!(decide(0.5, false, &c), Decision::AutoConfirm);
        assert_eq!(decide(0.49, false, &c), Decision::NoMatch);
    }
}
