//! Property tests for the threshold decision policy and aggregation bounds.

use proptest::prelude::*;

use tether_core::models::rule::{
    AttributeSelector, CorrelationRule, FuzzyAlgorithm, MatchType, RuleScope,
};
use tether_core::{Record, RecordRef, ThresholdConfig};
use tether_engine::snapshot::RuleSnapshot;
use tether_engine::{aggregate, decide};

fn config_strategy() -> impl Strategy<Value = ThresholdConfig> {
    (0.0_f64..=1.0, 0.0_f64..=1.0).prop_map(|(a, b)| {
        // Keep the invariant auto >= manual.
        let (manual, auto) = if a <= b { (a, b) } else { (b, a) };
        ThresholdConfig {
            auto_confirm_threshold: auto,
            manual_review_threshold: manual,
            ..Default::default()
        }
    })
}

proptest! {
    #[test]
    fn decide_is_monotonic_in_score(
        config in config_strategy(),
        lo in 0.0_f64..=1.0,
        hi in 0.0_f64..=1.0,
    ) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let d_lo = decide(lo, false, &config);
        let d_hi = decide(hi, false, &config);
        // Raising the score never moves the decision backward.
        prop_assert!(d_lo <= d_hi, "decide({lo})={d_lo:?} > decide({hi})={d_hi:?}");
    }

    #[test]
    fn definitive_hit_always_auto_confirms(
        config in config_strategy(),
        score in 0.0_f64..=1.0,
    ) {
        prop_assert_eq!(
            decide(score, true, &config),
            tether_core::Decision::AutoConfirm
        );
    }

    #[test]
    fn aggregate_score_is_always_in_unit_interval(
        weights in prop::collection::vec(0.0_f64..=10.0, 0..6),
        source_name in "[a-z]{0,12}",
        target_name in "[a-z]{0,12}",
    ) {
        let rules: Vec<CorrelationRule> = weights
            .iter()
            .enumerate()
            .map(|(i, &weight)| CorrelationRule {
                id: format!("r{i}"),
                name: format!("rule {i}"),
                scope: RuleScope::Tenant,
                attributes: AttributeSelector::Shared { attribute: "name".into() },
                match_type: MatchType::Fuzzy,
                algorithm: Some(FuzzyAlgorithm::JaroWinkler),
                expression: None,
                threshold: 0.5,
                weight,
                tier: (i as u32 % 3) + 1,
                is_definitive: i == 0 && weight > 5.0,
                normalize: false,
                priority: i as u32,
                is_active: true,
            })
            .collect();

        let snapshot = RuleSnapshot::build(RuleScope::Tenant, 1, rules);
        let source = Record::new(RecordRef::connector_account("c", "s"))
            .with_attribute("name", source_name);
        let target = Record::new(RecordRef::identity("t")).with_attribute("name", target_name);

        let agg = aggregate(&snapshot, &source, &target);
        prop_assert!((0.0..=1.0).contains(&agg.score), "score out of range: {}", agg.score);
        if agg.definitive_hit {
            prop_assert_eq!(agg.score, 1.0);
        }
        if snapshot.is_empty() {
            prop_assert!(agg.no_rules);
        }
    }
}
