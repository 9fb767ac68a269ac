/// Match expression compile errors.
///
/// Expressions are compiled at rule-validation time, never at evaluation
/// time, so a saved rule can never fail to evaluate. Offsets are byte
/// positions into the expression source for editor surfacing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character `{found}` at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("expected {expected} at offset {offset}, found `{found}`")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unknown record `{root}` at offset {offset}: only `source` and `target` are available")]
    UnknownRoot { root: String, offset: usize },

    #[error("unsupported operator `{operator}` at offset {offset}")]
    UnsupportedOperator { operator: String, offset: usize },

    #[error("expression exceeds maximum length of {max} bytes")]
    TooLong { max: usize },
}
