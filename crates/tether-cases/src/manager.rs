//! Case lifecycle operations on top of a `CorrelationStore`.
//!
//! All terminal transitions go through the store's compare-and-set, so two
//! reviewers resolving the same case concurrently produce exactly one
//! resolution. Link side effects run only for the winning transition.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use tether_core::errors::{CaseError, TetherResult};
use tether_core::traits::CorrelationStore;
use tether_core::{
    CaseResolution, CaseStatus, CorrelationCase, MatchCandidate, Page, RecordRef,
};

/// Manages correlation cases: opening, resolution, assignment.
pub struct CaseManager<S: CorrelationStore> {
    store: Arc<S>,
}

impl<S: CorrelationStore> CaseManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Open a pending case for a manual-review candidate, or refresh the
    /// existing open case for the same pair.
    ///
    /// Pending cases are unique per (source, target): a later run that
    /// re-scores an unresolved pair replaces the embedded candidate instead
    /// of queueing a duplicate for reviewers. Returns the case and whether
    /// it was newly created.
    pub fn open_case(
        &self,
        candidate: MatchCandidate,
    ) -> TetherResult<(CorrelationCase, bool)> {
        if let Some(existing) = self
            .store
            .find_pending_case(&candidate.source_ref, &candidate.target_ref)?
        {
            let refreshed = self.store.update_case_candidate(&existing.id, &candidate)?;
            info!(
                case_id = %refreshed.id,
                candidate_id = %candidate.id,
                score = candidate.aggregate_score,
                "refreshed open correlation case"
            );
            return Ok((refreshed, false));
        }

        let case = CorrelationCase {
            id: Uuid::new_v4().to_string(),
            candidate,
            status: CaseStatus::Pending,
            assigned_to: None,
            reassign_reason: None,
            resolution_reason: None,
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now(),
        };
        self.store.insert_case(&case)?;
        info!(
            case_id = %case.id,
            candidate_id = %case.candidate.id,
            score = case.candidate.aggregate_score,
            "opened correlation case"
        );
        Ok((case, true))
    }

    pub fn get_case(&self, case_id: &str) -> TetherResult<Option<CorrelationCase>> {
        self.store.get_case(case_id)
    }

    pub fn list_cases(
        &self,
        status: Option<CaseStatus>,
        page: Page,
    ) -> TetherResult<Vec<CorrelationCase>> {
        self.store.list_cases(status, page)
    }

    /// Confirm the candidate and commit the identity link.
    ///
    /// `candidate_id` must match the candidate embedded in the case, so a
    /// reviewer acting on a stale screen cannot confirm the wrong pair.
    pub fn confirm(
        &self,
        case_id: &str,
        candidate_id: &str,
        resolved_by: &str,
        reason: Option<&str>,
    ) -> TetherResult<CorrelationCase> {
        let case = self.load_pending(case_id, candidate_id)?;
        let resolved = self.store.resolve_case_and_link(
            case_id,
            &CaseResolution {
                new_status: CaseStatus::Confirmed,
                resolved_by: resolved_by.to_string(),
                reason: reason.map(str::to_string),
                resolved_at: Utc::now(),
            },
            &case.candidate.source_ref,
            &case.candidate.target_ref,
            resolved_by,
        )?;
        info!(case_id = %case_id, resolved_by = %resolved_by, "case confirmed");
        Ok(resolved)
    }

    /// Reject the candidate. Requires a non-empty reason; commits no link.
    pub fn reject(
        &self,
        case_id: &str,
        candidate_id: &str,
        resolved_by: &str,
        reason: &str,
    ) -> TetherResult<CorrelationCase> {
        if reason.trim().is_empty() {
            return Err(CaseError::MissingReason.into());
        }
        self.load_pending(case_id, candidate_id)?;
        let resolved = self.store.resolve_case(
            case_id,
            &CaseResolution {
                new_status: CaseStatus::Rejected,
                resolved_by: resolved_by.to_string(),
                reason: Some(reason.to_string()),
                resolved_at: Utc::now(),
            },
        )?;
        info!(case_id = %case_id, resolved_by = %resolved_by, "case rejected");
        Ok(resolved)
    }

    /// Resolve by provisioning a brand-new identity for the source record.
    ///
    /// Used when the reviewer decides the source matches nothing that exists.
    /// Returns the resolved case and the new identity's ref.
    pub fn create_identity(
        &self,
        case_id: &str,
        candidate_id: &str,
        resolved_by: &str,
        reason: Option<&str>,
    ) -> TetherResult<(CorrelationCase, RecordRef)> {
        let case = self.load_pending(case_id, candidate_id)?;
        let identity = RecordRef::identity(Uuid::new_v4().to_string());
        let resolved = self.store.resolve_case_and_link(
            case_id,
            &CaseResolution {
                new_status: CaseStatus::IdentityCreated,
                resolved_by: resolved_by.to_string(),
                reason: reason.map(str::to_string),
                resolved_at: Utc::now(),
            },
            &case.candidate.source_ref,
            &identity,
            resolved_by,
        )?;
        info!(
            case_id = %case_id,
            identity = %identity,
            resolved_by = %resolved_by,
            "case resolved with new identity"
        );
        Ok((resolved, identity))
    }

    /// Assign or unassign a pending case, recording the stated rationale.
    pub fn reassign(
        &self,
        case_id: &str,
        assigned_to: Option<&str>,
        reason: Option<&str>,
    ) -> TetherResult<CorrelationCase> {
        self.store.update_assignee(case_id, assigned_to, reason)
    }

    /// Fetch the case and verify it is pending and the candidate matches.
    ///
    /// The pending check here is advisory; the store's compare-and-set is
    /// what actually arbitrates races.
    fn load_pending(&self, case_id: &str, candidate_id: &str) -> TetherResult<CorrelationCase> {
        let case = self
            .store
            .get_case(case_id)?
            .ok_or_else(|| CaseError::NotFound {
                case_id: case_id.to_string(),
            })?;
        if case.candidate.id != candidate_id {
            return Err(CaseError::CandidateMismatch {
                case_id: case_id.to_string(),
                candidate_id: candidate_id.to_string(),
            }
            .into());
        }
        if case.status.is_terminal() {
            return Err(CaseError::AlreadyResolved {
                case_id: case_id.to_string(),
                status: case.status,
            }
            .into());
        }
        Ok(case)
    }
}
