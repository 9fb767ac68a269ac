//! Error taxonomy for the correlation engine.
//!
//! Each subsystem gets its own enum; `TetherError` folds them together for
//! callers that cross subsystem boundaries. Validation failures are expected,
//! first-class outcomes — they are surfaced with field attribution and never
//! logged as system faults.

pub mod case_error;
pub mod expression_error;
pub mod storage_error;
pub mod validation_error;

pub use case_error::CaseError;
pub use expression_error::ExpressionError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;

/// Top-level error for the correlation engine.
#[derive(Debug, thiserror::Error)]
pub enum TetherError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Case(#[from] CaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenience result alias used throughout the workspace.
pub type TetherResult<T> = Result<T, TetherError>;
