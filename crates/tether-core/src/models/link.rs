use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::record::RecordRef;

/// A committed identity link between a source record and a target record.
///
/// Links are idempotent per (source, target): committing the same pair twice
/// keeps the first row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityLink {
    pub source_ref: RecordRef,
    pub target_ref: RecordRef,
    /// Operator id, or "pipeline" for automatic confirmations.
    pub committed_by: String,
    pub committed_at: DateTime<Utc>,
}
