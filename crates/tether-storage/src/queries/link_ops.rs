//! Identity link commit and lookup.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use tether_core::errors::TetherResult;
use tether_core::models::link::IdentityLink;
use tether_core::RecordRef;

use crate::{to_serde_err, to_storage_err};

/// Commit a link. `INSERT OR IGNORE` on the (source, target) primary key
/// makes this idempotent: returns false when the link already existed.
pub fn commit_link(
    conn: &Connection,
    source: &RecordRef,
    target: &RecordRef,
    committed_by: &str,
) -> TetherResult<bool> {
    let source_json = serde_json::to_string(source).map_err(to_serde_err)?;
    let target_json = serde_json::to_string(target).map_err(to_serde_err)?;
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO identity_links
                (source_key, target_key, source_json, target_json, committed_by, committed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                source.to_string(),
                target.to_string(),
                source_json,
                target_json,
                committed_by,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

/// All links where the record appears on either side.
pub fn links_for(conn: &Connection, record: &RecordRef) -> TetherResult<Vec<IdentityLink>> {
    let mut stmt = conn
        .prepare(
            "SELECT source_json, target_json, committed_by, committed_at
             FROM identity_links
             WHERE source_key = ?1 OR target_key = ?1
             ORDER BY committed_at",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![record.to_string()], row_to_link)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut links = Vec::new();
    for row in rows {
        links.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(links)
}

fn row_to_link(row: &Row<'_>) -> rusqlite::Result<TetherResult<IdentityLink>> {
    let source_json: String = row.get(0)?;
    let target_json: String = row.get(1)?;
    let committed_by: String = row.get(2)?;
    let committed_at: String = row.get(3)?;

    Ok(build_link(source_json, target_json, committed_by, committed_at))
}

fn build_link(
    source_json: String,
    target_json: String,
    committed_by: String,
    committed_at: String,
) -> TetherResult<IdentityLink> {
    let source_ref = serde_json::from_str(&source_json).map_err(to_serde_err)?;
    let target_ref = serde_json::from_str(&target_json).map_err(to_serde_err)?;
    let committed_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&committed_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp `{committed_at}`: {e}")))?;

    Ok(IdentityLink {
        source_ref,
        target_ref,
        committed_by,
        committed_at,
    })
}
