//! Case insert, lookup, review-queue listing, and the resolution CAS.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use tether_core::errors::{CaseError, TetherError, TetherResult};
use tether_core::{CaseResolution, CaseStatus, CorrelationCase, MatchCandidate, Page, RecordRef};

use crate::queries::link_ops;
use crate::{to_serde_err, to_storage_err};

const CASE_COLUMNS: &str = "id, status, candidate_json, assigned_to, reassign_reason,
                            resolution_reason, resolved_by, resolved_at, created_at";

pub fn insert_case(conn: &Connection, case: &CorrelationCase) -> TetherResult<()> {
    let candidate_json = serde_json::to_string(&case.candidate).map_err(to_serde_err)?;
    conn.execute(
        "INSERT INTO correlation_cases
            (id, status, candidate_id, candidate_json, source_key, target_key,
             assigned_to, reassign_reason, resolution_reason, resolved_by,
             resolved_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            case.id,
            case.status.as_str(),
            case.candidate.id,
            candidate_json,
            case.candidate.source_ref.to_string(),
            case.candidate.target_ref.to_string(),
            case.assigned_to,
            case.reassign_reason,
            case.resolution_reason,
            case.resolved_by,
            case.resolved_at.map(|t| t.to_rfc3339()),
            case.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_case(conn: &Connection, case_id: &str) -> TetherResult<Option<CorrelationCase>> {
    conn.query_row(
        &format!("SELECT {CASE_COLUMNS} FROM correlation_cases WHERE id = ?1"),
        params![case_id],
        row_to_case,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

/// The open case for a pair, if one exists. The pending-pair unique index
/// guarantees at most one row matches.
pub fn find_pending_case(
    conn: &Connection,
    source: &RecordRef,
    target: &RecordRef,
) -> TetherResult<Option<CorrelationCase>> {
    conn.query_row(
        &format!(
            "SELECT {CASE_COLUMNS} FROM correlation_cases
             WHERE source_key = ?1 AND target_key = ?2 AND status = 'pending'"
        ),
        params![source.to_string(), target.to_string()],
        row_to_case,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

pub fn list_cases(
    conn: &Connection,
    status: Option<CaseStatus>,
    page: Page,
) -> TetherResult<Vec<CorrelationCase>> {
    let page = page.clamped();
    let mut cases = Vec::new();

    match status {
        Some(status) => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CASE_COLUMNS} FROM correlation_cases WHERE status = ?1
                     ORDER BY created_at, id LIMIT ?2 OFFSET ?3"
                ))
                .map_err(|e| to_storage_err(e.to_string()))?;
            let rows = stmt
                .query_map(
                    params![status.as_str(), page.limit as i64, page.offset as i64],
                    row_to_case,
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
            for row in rows {
                cases.push(row.map_err(|e| to_storage_err(e.to_string()))??);
            }
        }
        None => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CASE_COLUMNS} FROM correlation_cases
                     ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
                ))
                .map_err(|e| to_storage_err(e.to_string()))?;
            let rows = stmt
                .query_map(params![page.limit as i64, page.offset as i64], row_to_case)
                .map_err(|e| to_storage_err(e.to_string()))?;
            for row in rows {
                cases.push(row.map_err(|e| to_storage_err(e.to_string()))??);
            }
        }
    }

    Ok(cases)
}

/// Replace the embedded candidate of a still-pending case. Guarded by the
/// same pending check as resolutions, so a refresh can never clobber a
/// concurrently resolved case.
pub fn update_case_candidate(
    conn: &Connection,
    case_id: &str,
    candidate: &MatchCandidate,
) -> TetherResult<CorrelationCase> {
    let candidate_json = serde_json::to_string(candidate).map_err(to_serde_err)?;
    let changed = conn
        .execute(
            "UPDATE correlation_cases
             SET candidate_id = ?2, candidate_json = ?3, source_key = ?4, target_key = ?5
             WHERE id = ?1 AND status = 'pending'",
            params![
                case_id,
                candidate.id,
                candidate_json,
                candidate.source_ref.to_string(),
                candidate.target_ref.to_string(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    finish_pending_update(conn, case_id, changed)
}

/// Terminal transition as a compare-and-set on `status = 'pending'`.
///
/// Exactly one of two concurrent resolutions can satisfy the WHERE clause;
/// the loser re-reads the row to report `AlreadyResolved` (or `NotFound`
/// when the id never existed).
pub fn resolve_case(
    conn: &Connection,
    case_id: &str,
    resolution: &CaseResolution,
) -> TetherResult<CorrelationCase> {
    let changed = conn
        .execute(
            "UPDATE correlation_cases
             SET status = ?2, resolution_reason = ?3, resolved_by = ?4, resolved_at = ?5
             WHERE id = ?1 AND status = 'pending'",
            params![
                case_id,
                resolution.new_status.as_str(),
                resolution.reason,
                resolution.resolved_by,
                resolution.resolved_at.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    finish_pending_update(conn, case_id, changed)
}

/// Resolve a case and commit its identity link under one transaction.
///
/// A failed resolution rolls back without touching the link table; a
/// failure on the link insert rolls back the resolution. Either way the
/// case and its link stay consistent.
pub fn resolve_case_and_link(
    conn: &Connection,
    case_id: &str,
    resolution: &CaseResolution,
    source: &RecordRef,
    target: &RecordRef,
    committed_by: &str,
) -> TetherResult<CorrelationCase> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let case = resolve_case(&tx, case_id, resolution)?;
    link_ops::commit_link(&tx, source, target, committed_by)?;
    tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
    Ok(case)
}

/// Same-state mutation guarded by the same pending check as resolutions.
pub fn update_assignee(
    conn: &Connection,
    case_id: &str,
    assigned_to: Option<&str>,
    reason: Option<&str>,
) -> TetherResult<CorrelationCase> {
    let changed = conn
        .execute(
            "UPDATE correlation_cases SET assigned_to = ?2, reassign_reason = ?3
             WHERE id = ?1 AND status = 'pending'",
            params![case_id, assigned_to, reason],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    finish_pending_update(conn, case_id, changed)
}

/// Shared tail of every pending-guarded UPDATE: re-read on success, report
/// `AlreadyResolved` or `NotFound` on a miss.
fn finish_pending_update(
    conn: &Connection,
    case_id: &str,
    changed: usize,
) -> TetherResult<CorrelationCase> {
    if changed == 1 {
        return get_case(conn, case_id)?.ok_or_else(|| not_found(case_id));
    }

    match get_case(conn, case_id)? {
        Some(case) => Err(TetherError::Case(CaseError::AlreadyResolved {
            case_id: case_id.to_string(),
            status: case.status,
        })),
        None => Err(not_found(case_id)),
    }
}

fn not_found(case_id: &str) -> TetherError {
    TetherError::Case(CaseError::NotFound {
        case_id: case_id.to_string(),
    })
}

fn row_to_case(row: &Row<'_>) -> rusqlite::Result<TetherResult<CorrelationCase>> {
    let id: String = row.get(0)?;
    let status: String = row.get(1)?;
    let candidate_json: String = row.get(2)?;
    let assigned_to: Option<String> = row.get(3)?;
    let reassign_reason: Option<String> = row.get(4)?;
    let resolution_reason: Option<String> = row.get(5)?;
    let resolved_by: Option<String> = row.get(6)?;
    let resolved_at: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(build_case(
        id,
        status,
        candidate_json,
        assigned_to,
        reassign_reason,
        resolution_reason,
        resolved_by,
        resolved_at,
        created_at,
    ))
}

#[allow(clippy::too_many_arguments)]
fn build_case(
    id: String,
    status: String,
    candidate_json: String,
    assigned_to: Option<String>,
    reassign_reason: Option<String>,
    resolution_reason: Option<String>,
    resolved_by: Option<String>,
    resolved_at: Option<String>,
    created_at: String,
) -> TetherResult<CorrelationCase> {
    let candidate = serde_json::from_str(&candidate_json).map_err(to_serde_err)?;
    let status = CaseStatus::from_str(&status).map_err(to_storage_err)?;
    let resolved_at = resolved_at
        .map(|t| parse_timestamp(&t))
        .transpose()?;
    let created_at = parse_timestamp(&created_at)?;

    Ok(CorrelationCase {
        id,
        candidate,
        status,
        assigned_to,
        reassign_reason,
        resolution_reason,
        resolved_by,
        resolved_at,
        created_at,
    })
}

fn parse_timestamp(raw: &str) -> TetherResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp `{raw}`: {e}")))
}
