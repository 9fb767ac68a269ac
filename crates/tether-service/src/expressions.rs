//! Standalone expression validation, for rule editors.

use serde::Deserialize;

use tether_core::errors::ExpressionError;
use tether_core::Record;
use tether_match::CompiledExpression;

/// An optional pair of records to dry-run a candidate expression against.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpressionProbe {
    pub source: Record,
    pub target: Record,
}

/// Compile `expression` without saving anything.
///
/// A compile failure comes back with its byte offset so an editor can point
/// at the problem. On success, returns the dry-run verdict when a probe was
/// supplied, `None` otherwise.
pub fn validate_expression(
    expression: &str,
    probe: Option<&ExpressionProbe>,
) -> Result<Option<bool>, ExpressionError> {
    let compiled = CompiledExpression::compile(expression)?;
    Ok(probe.map(|p| compiled.evaluate(&p.source, &p.target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::RecordRef;

    fn probe(source_email: &str, target_email: &str) -> ExpressionProbe {
        ExpressionProbe {
            source: Record::new(RecordRef::connector_account("hr", "a-1"))
                .with_attribute("email", source_email),
            target: Record::new(RecordRef::identity("i-1"))
                .with_attribute("email", target_email),
        }
    }

    #[test]
    fn valid_expression_without_probe_returns_none() {
        let verdict = validate_expression("source.email == target.email", None).unwrap();
        assert_eq!(verdict, None);
    }

    #[test]
    fn probe_returns_the_dry_run_verdict() {
        let expr = "source.email == target.email";
        assert_eq!(
            validate_expression(expr, Some(&probe("a@b.io", "a@b.io"))).unwrap(),
            Some(true)
        );
        assert_eq!(
            validate_expression(expr, Some(&probe("a@b.io", "z@b.io"))).unwrap(),
            Some(false)
        );
    }

    #[test]
    fn compile_failure_carries_an_offset() {
        let err = validate_expression("source.email = target.email", None).unwrap_err();
        match err {
            ExpressionError::UnsupportedOperator { operator, offset } => {
                assert_eq!(operator, "=");
                assert_eq!(offset, 13);
            }
            other => panic!("expected UnsupportedOperator, got {other:?}"),
        }
    }
}
