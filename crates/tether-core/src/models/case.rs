use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::candidate::MatchCandidate;

/// Lifecycle status of a correlation case.
///
/// `Pending` is the only non-terminal status. Reassignment is a same-state
/// mutation of `assigned_to`, not a status of its own. Terminal cases are
/// retained for audit, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pending,
    Confirmed,
    Rejected,
    IdentityCreated,
}

impl CaseStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::IdentityCreated => "identity_created",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            "identity_created" => Ok(Self::IdentityCreated),
            other => Err(format!("unknown case status: {other}")),
        }
    }
}

/// A unit of human-reviewable work, created when a candidate lands in the
/// manual-review band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCase {
    pub id: String,
    pub candidate: MatchCandidate,
    pub status: CaseStatus,
    pub assigned_to: Option<String>,
    /// Rationale supplied with the most recent reassignment, kept for audit.
    #[serde(default)]
    pub reassign_reason: Option<String>,
    pub resolution_reason: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The terminal transition applied by a resolution operation.
///
/// Applied by the store as a compare-and-set on `status = pending`, so two
/// concurrent resolutions of the same case yield exactly one success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResolution {
    /// Must be a terminal status.
    pub new_status: CaseStatus,
    pub resolved_by: String,
    pub reason: Option<String>,
    pub resolved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!CaseStatus::Pending.is_terminal());
        assert!(CaseStatus::Confirmed.is_terminal());
        assert!(CaseStatus::Rejected.is_terminal());
        assert!(CaseStatus::IdentityCreated.is_terminal());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            CaseStatus::Pending,
            CaseStatus::Confirmed,
            CaseStatus::Rejected,
            CaseStatus::IdentityCreated,
        ] {
            assert_eq!(status.as_str().parse::<CaseStatus>().unwrap(), status);
        }
    }
}
