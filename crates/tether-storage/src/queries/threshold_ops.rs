//! Threshold config get/upsert, one row per scope.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use tether_core::errors::TetherResult;
use tether_core::{RuleScope, ThresholdConfig};

use crate::{to_serde_err, to_storage_err};

pub fn get_threshold(
    conn: &Connection,
    scope: &RuleScope,
) -> TetherResult<Option<ThresholdConfig>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT config_json FROM threshold_configs WHERE scope_key = ?1",
            params![scope.key()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    json.map(|j| serde_json::from_str(&j).map_err(to_serde_err))
        .transpose()
}

pub fn upsert_threshold(
    conn: &Connection,
    scope: &RuleScope,
    config: &ThresholdConfig,
) -> TetherResult<()> {
    let config_json = serde_json::to_string(config).map_err(to_serde_err)?;
    conn.execute(
        "INSERT INTO threshold_configs (scope_key, config_json, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(scope_key) DO UPDATE SET
            config_json = excluded.config_json,
            updated_at = excluded.updated_at",
        params![scope.key(), config_json, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
