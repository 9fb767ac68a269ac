use crate::models::case::CaseStatus;

/// Case lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaseError {
    /// The case already reached a terminal status. Re-resolving is an error,
    /// not a no-op, so operators notice duplicate actions.
    #[error("case {case_id} already resolved: status is {status}")]
    AlreadyResolved { case_id: String, status: CaseStatus },

    #[error("case not found: {case_id}")]
    NotFound { case_id: String },

    #[error("rejection requires a non-empty reason")]
    MissingReason,

    #[error("candidate {candidate_id} does not belong to case {case_id}")]
    CandidateMismatch {
        case_id: String,
        candidate_id: String,
    },
}
