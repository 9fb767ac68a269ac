use crate::errors::TetherResult;
use crate::models::candidate::MatchCandidate;
use crate::models::case::{CaseResolution, CaseStatus, CorrelationCase};
use crate::models::link::IdentityLink;
use crate::models::page::Page;
use crate::models::record::RecordRef;
use crate::models::rule::{CorrelationRule, RuleScope, ValidRule};
use crate::models::threshold::ThresholdConfig;

/// Durable state the engine tracks: rules, threshold configs, cases, links.
///
/// Only validated rules can be persisted. Case status transitions go through
/// `resolve_case`, which must be a compare-and-set expecting `Pending` —
/// two concurrent resolutions of the same case yield exactly one success and
/// one `CaseError::AlreadyResolved`.
pub trait CorrelationStore: Send + Sync {
    // --- Rules ---
    fn put_rule(&self, rule: &ValidRule) -> TetherResult<()>;
    fn get_rule(&self, rule_id: &str) -> TetherResult<Option<CorrelationRule>>;
    fn list_rules(&self, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>>;
    /// Active rules for a scope, ordered by (tier, priority, id).
    fn active_rules(&self, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>>;
    /// Soft delete. Returns false when the rule does not exist.
    fn deactivate_rule(&self, rule_id: &str) -> TetherResult<bool>;

    // --- Threshold configs (one per scope) ---
    fn get_threshold(&self, scope: &RuleScope) -> TetherResult<Option<ThresholdConfig>>;
    fn upsert_threshold(&self, scope: &RuleScope, config: &ThresholdConfig) -> TetherResult<()>;

    // --- Cases ---
    fn insert_case(&self, case: &CorrelationCase) -> TetherResult<()>;
    fn get_case(&self, case_id: &str) -> TetherResult<Option<CorrelationCase>>;
    /// The open case for a pair, if one exists. At most one can: pending
    /// cases are unique per (source, target).
    fn find_pending_case(
        &self,
        source: &RecordRef,
        target: &RecordRef,
    ) -> TetherResult<Option<CorrelationCase>>;
    fn list_cases(
        &self,
        status: Option<CaseStatus>,
        page: Page,
    ) -> TetherResult<Vec<CorrelationCase>>;
    /// Replace the embedded candidate of a still-pending case (a later run
    /// re-scored the same pair). Returns the updated case.
    fn update_case_candidate(
        &self,
        case_id: &str,
        candidate: &MatchCandidate,
    ) -> TetherResult<CorrelationCase>;
    /// Compare-and-set terminal transition: succeeds only if the case is
    /// currently `Pending`. Returns the updated case.
    fn resolve_case(
        &self,
        case_id: &str,
        resolution: &CaseResolution,
    ) -> TetherResult<CorrelationCase>;
    /// Resolve a case and commit an identity link in one transaction, so a
    /// confirmed case can never exist without its link.
    fn resolve_case_and_link(
        &self,
        case_id: &str,
        resolution: &CaseResolution,
        source: &RecordRef,
        target: &RecordRef,
        committed_by: &str,
    ) -> TetherResult<CorrelationCase>;
    /// Update `assigned_to` on a non-terminal case, recording the optional
    /// reassignment rationale.
    fn update_assignee(
        &self,
        case_id: &str,
        assigned_to: Option<&str>,
        reason: Option<&str>,
    ) -> TetherResult<CorrelationCase>;

    // --- Identity links ---
    /// Commit a link. Idempotent per (source, target); returns false when the
    /// link already existed.
    fn commit_link(
        &self,
        source: &RecordRef,
        target: &RecordRef,
        committed_by: &str,
    ) -> TetherResult<bool>;
    fn links_for(&self, record: &RecordRef) -> TetherResult<Vec<IdentityLink>>;
}
