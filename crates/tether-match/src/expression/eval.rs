//! Total evaluation of compiled expressions.

use tether_core::Record;

use super::ast::{CmpOp, Expr, Operand, Side};

/// Evaluate an expression tree against a source/target pair.
pub fn eval(expr: &Expr, source: &Record, target: &Record) -> bool {
    match expr {
        Expr::Cmp { op, lhs, rhs } => compare(*op, lhs, rhs, source, target),
        Expr::And(lhs, rhs) => eval(lhs, source, target) && eval(rhs, source, target),
        Expr::Or(lhs, rhs) => eval(lhs, source, target) || eval(rhs, source, target),
        Expr::Not(inner) => !eval(inner, source, target),
    }
}

/// Any comparison touching a missing attribute is false. This keeps
/// evaluation total: one malformed record degrades that comparison, it does
/// not abort aggregation.
fn compare(op: CmpOp, lhs: &Operand, rhs: &Operand, source: &Record, target: &Record) -> bool {
    let (Some(left), Some(right)) = (resolve(lhs, source, target), resolve(rhs, source, target))
    else {
        return false;
    };
    match op {
        CmpOp::Eq => left == right,
        CmpOp::Ne => left != right,
        CmpOp::Contains => left.contains(right),
        CmpOp::StartsWith => left.starts_with(right),
        CmpOp::EndsWith => left.ends_with(right),
    }
}

fn resolve<'a>(operand: &'a Operand, source: &'a Record, target: &'a Record) -> Option<&'a str> {
    match operand {
        Operand::Literal(value) => Some(value.as_str()),
        Operand::Attr(attr) => match attr.side {
            Side::Source => source.attribute(&attr.attribute),
            Side::Target => target.attribute(&attr.attribute),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::CompiledExpression;
    use tether_core::RecordRef;

    fn pair() -> (Record, Record) {
        (
            Record::new(RecordRef::connector_account("hr", "e1"))
                .with_attribute("name", "Dana Reyes"),
            Record::new(RecordRef::identity("i1")).with_attribute("name", "Dana Reyes"),
        )
    }

    #[test]
    fn not_of_missing_comparison_is_true() {
        // The comparison itself is false, so its negation is true. Rule
        // authors testing for absence rely on this.
        let (source, target) = pair();
        let expr = CompiledExpression::compile("!(source.phone == target.phone)").unwrap();
        assert!(expr.evaluate(&source, &target));
    }

    #[test]
    fn contains_is_directional() {
        let (source, target) = pair();
        let expr = CompiledExpression::compile("source.name contains 'Rey'").unwrap();
        assert!(expr.evaluate(&source, &target));
        let expr = CompiledExpression::compile("'Rey' contains source.name").unwrap();
        assert!(!expr.evaluate(&source, &target));
    }
}
