//! SqliteStore — owns the connection, runs migrations on open, implements
//! the `CorrelationStore` trait.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use tether_core::errors::TetherResult;
use tether_core::traits::CorrelationStore;
use tether_core::{
    CaseResolution, CaseStatus, CorrelationCase, CorrelationRule, IdentityLink, MatchCandidate,
    Page, RecordRef, RuleScope, ThresholdConfig, ValidRule,
};

use crate::migrations;
use crate::queries::{case_ops, link_ops, rule_ops, threshold_ops};
use crate::to_storage_err;

/// SQLite-backed correlation store.
///
/// A single connection behind a mutex: the engine's read volume is a review
/// queue, not a retrieval hot path, and one connection keeps the case CAS
/// serializable without further ceremony.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> TetherResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        info!(path = %path.display(), "opened correlation store");
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> TetherResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> TetherResult<()> {
        self.with_conn(|conn| migrations::run_migrations(conn))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> TetherResult<T>) -> TetherResult<T> {
        let guard = match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }
}

impl CorrelationStore for SqliteStore {
    fn put_rule(&self, rule: &ValidRule) -> TetherResult<()> {
        self.with_conn(|conn| rule_ops::put_rule(conn, rule))
    }

    fn get_rule(&self, rule_id: &str) -> TetherResult<Option<CorrelationRule>> {
        self.with_conn(|conn| rule_ops::get_rule(conn, rule_id))
    }

    fn list_rules(&self, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>> {
        self.with_conn(|conn| rule_ops::list_rules(conn, scope))
    }

    fn active_rules(&self, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>> {
        self.with_conn(|conn| rule_ops::active_rules(conn, scope))
    }

    fn deactivate_rule(&self, rule_id: &str) -> TetherResult<bool> {
        self.with_conn(|conn| rule_ops::deactivate_rule(conn, rule_id))
    }

    fn get_threshold(&self, scope: &RuleScope) -> TetherResult<Option<ThresholdConfig>> {
        self.with_conn(|conn| threshold_ops::get_threshold(conn, scope))
    }

    fn upsert_threshold(&self, scope: &RuleScope, config: &ThresholdConfig) -> TetherResult<()> {
        self.with_conn(|conn| threshold_ops::upsert_threshold(conn, scope, config))
    }

    fn insert_case(&self, case: &CorrelationCase) -> TetherResult<()> {
        self.with_conn(|conn| case_ops::insert_case(conn, case))
    }

    fn get_case(&self, case_id: &str) -> TetherResult<Option<CorrelationCase>> {
        self.with_conn(|conn| case_ops::get_case(conn, case_id))
    }

    fn find_pending_case(
        &self,
        source: &RecordRef,
        target: &RecordRef,
    ) -> TetherResult<Option<CorrelationCase>> {
        self.with_conn(|conn| case_ops::find_pending_case(conn, source, target))
    }

    fn list_cases(
        &self,
        status: Option<CaseStatus>,
        page: Page,
    ) -> TetherResult<Vec<CorrelationCase>> {
        self.with_conn(|conn| case_ops::list_cases(conn, status, page))
    }

    fn update_case_candidate(
        &self,
        case_id: &str,
        candidate: &MatchCandidate,
    ) -> TetherResult<CorrelationCase> {
        self.with_conn(|conn| case_ops::update_case_candidate(conn, case_id, candidate))
    }

    fn resolve_case(
        &self,
        case_id: &str,
        resolution: &CaseResolution,
    ) -> TetherResult<CorrelationCase> {
        self.with_conn(|conn| case_ops::resolve_case(conn, case_id, resolution))
    }

    fn resolve_case_and_link(
        &self,
        case_id: &str,
        resolution: &CaseResolution,
        source: &RecordRef,
        target: &RecordRef,
        committed_by: &str,
    ) -> TetherResult<CorrelationCase> {
        self.with_conn(|conn| {
            case_ops::resolve_case_and_link(conn, case_id, resolution, source, target, committed_by)
        })
    }

    fn update_assignee(
        &self,
        case_id: &str,
        assigned_to: Option<&str>,
        reason: Option<&str>,
    ) -> TetherResult<CorrelationCase> {
        self.with_conn(|conn| case_ops::update_assignee(conn, case_id, assigned_to, reason))
    }

    fn commit_link(
        &self,
        source: &RecordRef,
        target: &RecordRef,
        committed_by: &str,
    ) -> TetherResult<bool> {
        self.with_conn(|conn| link_ops::commit_link(conn, source, target, committed_by))
    }

    fn links_for(&self, record: &RecordRef) -> TetherResult<Vec<IdentityLink>> {
        self.with_conn(|conn| link_ops::links_for(conn, record))
    }
}
