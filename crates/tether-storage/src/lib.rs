//! # tether-storage
//!
//! SQLite persistence for the correlation engine: rules (with a scope
//! discriminator), one threshold config per scope, cases (indexed on
//! status for review-queue listing), and idempotent identity links.
//!
//! The case resolution compare-and-set lives here as a conditional
//! `UPDATE ... WHERE status = 'pending'`, so the single-resolution
//! guarantee holds across processes sharing the database, not just threads.

pub mod engine;
pub mod migrations;
pub mod queries;

pub use engine::SqliteStore;

use tether_core::errors::{StorageError, TetherError};

/// Adapt a low-level SQLite failure into the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> TetherError {
    TetherError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}

/// Adapt a serde failure on a stored JSON column.
pub(crate) fn to_serde_err(e: serde_json::Error) -> TetherError {
    TetherError::Storage(StorageError::Serialization {
        reason: e.to_string(),
    })
}
