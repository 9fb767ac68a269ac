/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("rule not found: {rule_id}")]
    RuleNotFound { rule_id: String },

    #[error("serialization failed: {reason}")]
    Serialization { reason: String },
}
