//! Rule evaluation: one prepared rule against one record pair.

use tether_core::errors::ExpressionError;
use tether_core::{MatchType, Record, ValidRule};

use crate::exact;
use crate::expression::CompiledExpression;
use crate::fuzzy;

/// Evaluator output for one rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleScore {
    /// Raw similarity in [0.0, 1.0].
    pub score: f64,
    /// Whether the score reached the rule's threshold.
    pub hit: bool,
}

/// A validated rule with its expression compiled, ready for evaluation.
///
/// Preparation is the last point an expression can fail; after it, scoring
/// is total. Prepared rules are immutable and `Send + Sync`, so a snapshot
/// of them can be shared across worker threads for the duration of a batch.
#[derive(Debug, Clone)]
pub struct PreparedRule {
    rule: ValidRule,
    expression: Option<CompiledExpression>,
}

impl PreparedRule {
    /// Compile the rule's expression (if any).
    ///
    /// A validated expression rule always carries a non-empty expression,
    /// but compilation is still checked here so a rule saved before a
    /// language change can be re-verified on snapshot load.
    pub fn prepare(rule: ValidRule) -> Result<Self, ExpressionError> {
        let expression = match (rule.match_type, rule.expression.as_deref()) {
            (MatchType::Expression, Some(src)) => Some(CompiledExpression::compile(src)?),
            _ => None,
        };
        Ok(Self { rule, expression })
    }

    pub fn rule(&self) -> &ValidRule {
        &self.rule
    }

    /// Score this rule against a pair. Missing attributes score 0.0 —
    /// graceful degradation, never an error.
    pub fn score(&self, source: &Record, target: &Record) -> RuleScore {
        let score = match self.rule.match_type {
            MatchType::Exact => self.attribute_pair(source, target).map_or(0.0, |(a, b)| {
                exact::score(a, b, self.rule.normalize)
            }),
            // `algorithm` presence is a structural invariant of ValidRule;
            // scoring stays total regardless.
            MatchType::Fuzzy => match self.rule.algorithm {
                Some(algorithm) => self.attribute_pair(source, target).map_or(0.0, |(a, b)| {
                    if self.rule.normalize {
                        fuzzy::similarity(algorithm, &exact::normalize(a), &exact::normalize(b))
                    } else {
                        fuzzy::similarity(algorithm, a, b)
                    }
                }),
                None => 0.0,
            },
            MatchType::Expression => match &self.expression {
                Some(compiled) => {
                    if compiled.evaluate(source, target) {
                        1.0
                    } else {
                        0.0
                    }
                }
                None => 0.0,
            },
        };

        RuleScore {
            score,
            hit: score >= self.rule.threshold,
        }
    }

    fn attribute_pair<'a>(
        &self,
        source: &'a Record,
        target: &'a Record,
    ) -> Option<(&'a str, &'a str)> {
        let a = source.attribute(self.rule.attributes.source_side())?;
        let b = target.attribute(self.rule.attributes.target_side())?;
        Some((a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::models::rule::{AttributeSelector, CorrelationRule, FuzzyAlgorithm, RuleScope};
    use tether_core::rules::validate;
    use tether_core::RecordRef;

    fn rule(match_type: MatchType) -> CorrelationRule {
        CorrelationRule {
            id: "r1".into(),
            name: "test rule".into(),
            scope: RuleScope::Tenant,
            attributes: AttributeSelector::Shared {
                attribute: "email".into(),
            },
            match_type,
            algorithm: matches!(match_type, MatchType::Fuzzy)
                .then_some(FuzzyAlgorithm::JaroWinkler),
            expression: matches!(match_type, MatchType::Expression)
                .then(|| "source.email == target.email".to_string()),
            threshold: 0.8,
            weight: 1.0,
            tier: 1,
            is_definitive: false,
            normalize: true,
            priority: 0,
            is_active: true,
        }
    }

    fn prepared(match_type: MatchType) -> PreparedRule {
        PreparedRule::prepare(validate(rule(match_type)).unwrap()).unwrap()
    }

    fn record(email: Option<&str>) -> Record {
        let mut r = Record::new(RecordRef::identity("x"));
        if let Some(email) = email {
            r = r.with_attribute("email", email);
        }
        r
    }

    #[test]
    fn exact_rule_hits_on_normalized_equality() {
        let prepared = prepared(MatchType::Exact);
        let result = prepared.score(&record(Some(" Alice@Corp.io ")), &record(Some("alice@corp.io")));
        assert_eq!(result.score, 1.0);
        assert!(result.hit);
    }

    #[test]
    fn missing_attribute_scores_zero_without_error() {
        for mt in [MatchType::Exact, MatchType::Fuzzy] {
            let result = prepared(mt).score(&record(None), &record(Some("a@b.io")));
            assert_eq!(result.score, 0.0);
            assert!(!result.hit);
        }
    }

    #[test]
    fn fuzzy_rule_scores_between_zero_and_one() {
        let result = prepared(MatchType::Fuzzy)
            .score(&record(Some("alice@corp.io")), &record(Some("alice@crop.io")));
        assert!(result.score > 0.8 && result.score < 1.0, "got {}", result.score);
        assert!(result.hit);
    }

    #[test]
    fn expression_rule_scores_binary() {
        let prepared = prepared(MatchType::Expression);
        let hit = prepared.score(&record(Some("a@b.io")), &record(Some("a@b.io")));
        assert_eq!(hit.score, 1.0);
        let miss = prepared.score(&record(Some("a@b.io")), &record(Some("c@d.io")));
        assert_eq!(miss.score, 0.0);
    }

    #[test]
    fn below_threshold_score_is_not_a_hit() {
        let mut raw = rule(MatchType::Fuzzy);
        raw.threshold = 0.99;
        let prepared = PreparedRule::prepare(validate(raw).unwrap()).unwrap();
        let result = prepared.score(&record(Some("alice")), &record(Some("alicia")));
        assert!(result.score > 0.0);
        assert!(!result.hit);
    }
}
