//! Rule upsert, lookup, listing, soft delete.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use tether_core::errors::TetherResult;
use tether_core::{CorrelationRule, RuleScope, ValidRule};

use crate::{to_serde_err, to_storage_err};

/// Upsert a validated rule. The full rule is stored as JSON alongside the
/// columns the active-rules query filters and orders on.
pub fn put_rule(conn: &Connection, rule: &ValidRule) -> TetherResult<()> {
    let rule_json = serde_json::to_string(rule.as_ref()).map_err(to_serde_err)?;
    conn.execute(
        "INSERT INTO correlation_rules (id, scope_key, tier, priority, is_active, rule_json, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            scope_key = excluded.scope_key,
            tier = excluded.tier,
            priority = excluded.priority,
            is_active = excluded.is_active,
            rule_json = excluded.rule_json,
            updated_at = excluded.updated_at",
        params![
            rule.id,
            rule.scope.key(),
            rule.tier,
            rule.priority,
            rule.is_active as i32,
            rule_json,
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_rule(conn: &Connection, rule_id: &str) -> TetherResult<Option<CorrelationRule>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT rule_json FROM correlation_rules WHERE id = ?1",
            params![rule_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    json.map(|j| serde_json::from_str(&j).map_err(to_serde_err))
        .transpose()
}

pub fn list_rules(conn: &Connection, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>> {
    query_rules(conn, scope, false)
}

/// Active rules in (tier, priority, id) evaluation order.
pub fn active_rules(conn: &Connection, scope: &RuleScope) -> TetherResult<Vec<CorrelationRule>> {
    query_rules(conn, scope, true)
}

fn query_rules(
    conn: &Connection,
    scope: &RuleScope,
    active_only: bool,
) -> TetherResult<Vec<CorrelationRule>> {
    let sql = if active_only {
        "SELECT rule_json FROM correlation_rules
         WHERE scope_key = ?1 AND is_active = 1
         ORDER BY tier, priority, id"
    } else {
        "SELECT rule_json FROM correlation_rules
         WHERE scope_key = ?1
         ORDER BY tier, priority, id"
    };
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![scope.key()], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut rules = Vec::new();
    for row in rows {
        let json = row.map_err(|e| to_storage_err(e.to_string()))?;
        rules.push(serde_json::from_str(&json).map_err(to_serde_err)?);
    }
    Ok(rules)
}

/// Soft delete: flips `is_active` in both the column and the stored JSON so
/// the two never disagree. Returns false for an unknown rule.
pub fn deactivate_rule(conn: &Connection, rule_id: &str) -> TetherResult<bool> {
    let Some(mut rule) = get_rule(conn, rule_id)? else {
        return Ok(false);
    };
    rule.is_active = false;
    let rule_json = serde_json::to_string(&rule).map_err(to_serde_err)?;
    let changed = conn
        .execute(
            "UPDATE correlation_rules
             SET is_active = 0, rule_json = ?2, updated_at = ?3
             WHERE id = ?1",
            params![rule_id, rule_json, Utc::now().to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}
