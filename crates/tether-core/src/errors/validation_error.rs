/// Rule and threshold validation errors.
///
/// Every variant names the offending field so the caller can surface the
/// failure next to the right form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("{field} out of range: {allowed}")]
    OutOfRange {
        field: &'static str,
        allowed: &'static str,
    },

    #[error("structurally incomplete rule: {field}: {reason}")]
    StructurallyIncomplete {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// The field this error is attributed to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::OutOfRange { field, .. }
            | Self::StructurallyIncomplete { field, .. } => field,
        }
    }
}
