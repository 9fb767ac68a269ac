use crate::constants;
use crate::errors::ValidationError;
use crate::models::rule::{AttributeSelector, CorrelationRule, MatchType, RuleScope, ValidRule};

/// Validate a raw rule, returning a [`ValidRule`] on success.
///
/// Pure and total — never touches storage. Enforces the two structural
/// invariants (`Expression` needs a non-empty expression, `Fuzzy` needs an
/// algorithm) in addition to range and presence checks, so an incomplete
/// rule is never representable as valid.
pub fn validate(rule: CorrelationRule) -> Result<ValidRule, ValidationError> {
    check_name("id", &rule.id)?;
    check_name("name", &rule.name)?;
    check_scope_attributes(&rule)?;

    if !(0.0..=1.0).contains(&rule.threshold) {
        return Err(ValidationError::OutOfRange {
            field: "threshold",
            allowed: "0.0..=1.0",
        });
    }
    if !(0.0..=constants::MAX_WEIGHT).contains(&rule.weight) {
        return Err(ValidationError::OutOfRange {
            field: "weight",
            allowed: "0.0..=1000.0",
        });
    }
    if rule.tier < 1 || rule.tier > constants::MAX_TIER {
        return Err(ValidationError::OutOfRange {
            field: "tier",
            allowed: "1..=100",
        });
    }

    match rule.match_type {
        MatchType::Exact => {}
        MatchType::Fuzzy => {
            if rule.algorithm.is_none() {
                return Err(ValidationError::StructurallyIncomplete {
                    field: "algorithm",
                    reason: "fuzzy rules must name an algorithm".to_string(),
                });
            }
        }
        MatchType::Expression => match rule.expression.as_deref() {
            None => {
                return Err(ValidationError::StructurallyIncomplete {
                    field: "expression",
                    reason: "expression rules must carry an expression".to_string(),
                });
            }
            Some(expr) if expr.trim().is_empty() => {
                return Err(ValidationError::StructurallyIncomplete {
                    field: "expression",
                    reason: "expression must be non-empty".to_string(),
                });
            }
            Some(expr) if expr.len() > constants::MAX_EXPRESSION_LEN => {
                return Err(ValidationError::OutOfRange {
                    field: "expression",
                    allowed: "at most 2048 bytes",
                });
            }
            Some(_) => {}
        },
    }

    Ok(ValidRule(rule))
}

fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    if value.len() > constants::MAX_NAME_LEN {
        return Err(ValidationError::OutOfRange {
            field,
            allowed: "at most 256 bytes",
        });
    }
    Ok(())
}

/// Connector-scoped rules address a source/target attribute pair; tenant-wide
/// rules address one shared attribute.
fn check_scope_attributes(rule: &CorrelationRule) -> Result<(), ValidationError> {
    match (&rule.scope, &rule.attributes) {
        (RuleScope::Connector { connector_id }, AttributeSelector::Pair { .. }) => {
            check_name("connector_id", connector_id)?;
        }
        (RuleScope::Connector { .. }, AttributeSelector::Shared { .. }) => {
            return Err(ValidationError::MissingField {
                field: "target_attribute",
            });
        }
        (RuleScope::Tenant, AttributeSelector::Shared { .. }) => {}
        (RuleScope::Tenant, AttributeSelector::Pair { .. }) => {
            return Err(ValidationError::StructurallyIncomplete {
                field: "attribute",
                reason: "tenant-wide rules use a single shared attribute".to_string(),
            });
        }
    }
    check_name("source_attribute", rule.attributes.source_side())?;
    check_name("target_attribute", rule.attributes.target_side())?;
    Ok(())
}
