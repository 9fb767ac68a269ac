//! The restricted match expression language.
//!
//! A small predicate language over two fixed record maps, `source` and
//! `target`. It supports equality, inequality, substring containment,
//! prefix/suffix checks, and boolean composition:
//!
//! ```text
//! source.email == target.email
//! source.dept contains "eng" && !(source.status == "disabled")
//! ```
//!
//! Anything resembling code execution is a compile error: no function
//! calls, no loops, no arithmetic, no identifier roots other than `source`
//! and `target`. This is a safety boundary, not a convenience feature —
//! the AST is limited to comparison and boolean nodes so the surface stays
//! auditable.
//!
//! Compilation happens at rule-save time; evaluation of a compiled
//! expression is total and cannot fail. A comparison touching a missing
//! attribute is false.

pub mod ast;
pub mod eval;
pub mod parser;
pub mod token;

use tether_core::errors::ExpressionError;
use tether_core::Record;

use ast::Expr;

/// A compiled, reusable match expression.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    ast: Expr,
    source_text: String,
}

impl CompiledExpression {
    /// Lex and parse an expression. All malformed input is rejected here,
    /// never at evaluation time.
    pub fn compile(src: &str) -> Result<Self, ExpressionError> {
        if src.trim().is_empty() {
            return Err(ExpressionError::Empty);
        }
        if src.len() > tether_core::constants::MAX_EXPRESSION_LEN {
            return Err(ExpressionError::TooLong {
                max: tether_core::constants::MAX_EXPRESSION_LEN,
            });
        }
        let tokens = token::lex(src)?;
        let ast = parser::parse(&tokens)?;
        Ok(Self {
            ast,
            source_text: src.to_string(),
        })
    }

    /// Evaluate against a source/target pair. Total: missing attributes
    /// make the enclosing comparison false.
    pub fn evaluate(&self, source: &Record, target: &Record) -> bool {
        eval::eval(&self.ast, source, target)
    }

    /// The original expression text.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::RecordRef;

    fn source() -> Record {
        Record::new(RecordRef::connector_account("ldap", "u1"))
            .with_attribute("email", "alice@corp.io")
            .with_attribute("dept", "engineering")
    }

    fn target() -> Record {
        Record::new(RecordRef::identity("i1"))
            .with_attribute("email", "alice@corp.io")
            .with_attribute("status", "active")
    }

    #[test]
    fn equality_across_records() {
        let expr = CompiledExpression::compile("source.email == target.email").unwrap();
        assert!(expr.evaluate(&source(), &target()));
    }

    #[test]
    fn compound_boolean_composition() {
        let expr = CompiledExpression::compile(
            "source.email == target.email && (source.dept contains \"eng\" || target.status == 'disabled')",
        )
        .unwrap();
        assert!(expr.evaluate(&source(), &target()));
    }

    #[test]
    fn negation() {
        let expr = CompiledExpression::compile("!(target.status == 'disabled')").unwrap();
        assert!(expr.evaluate(&source(), &target()));
    }

    #[test]
    fn missing_attribute_is_false_not_an_error() {
        let expr = CompiledExpression::compile("source.phone == target.phone").unwrap();
        assert!(!expr.evaluate(&source(), &target()));
        // Inequality against a missing attribute is also false.
        let expr = CompiledExpression::compile("source.phone != target.email").unwrap();
        assert!(!expr.evaluate(&source(), &target()));
    }

    #[test]
    fn rejects_unknown_identifier_root() {
        let err = CompiledExpression::compile("env.secret == 'x'").unwrap_err();
        assert!(matches!(err, ExpressionError::UnknownRoot { .. }));
    }

    #[test]
    fn rejects_function_call_syntax() {
        assert!(CompiledExpression::compile("source.email.len() == '5'").is_err());
        assert!(CompiledExpression::compile("exec('rm -rf /')").is_err());
    }

    #[test]
    fn rejects_empty_expression() {
        assert_eq!(
            CompiledExpression::compile("   ").unwrap_err(),
            ExpressionError::Empty
        );
    }

    #[test]
    fn rejects_single_equals() {
        assert!(CompiledExpression::compile("source.email = target.email").is_err());
    }

    #[test]
    fn starts_and_ends_with() {
        let expr = CompiledExpression::compile("source.email starts_with 'alice'").unwrap();
        assert!(expr.evaluate(&source(), &target()));
        let expr = CompiledExpression::compile("source.email ends_with '.io'").unwrap();
        assert!(expr.evaluate(&source(), &target()));
    }
}
