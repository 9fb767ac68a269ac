//! v001: correlation_rules.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS correlation_rules (
            id          TEXT PRIMARY KEY,
            scope_key   TEXT NOT NULL,
            tier        INTEGER NOT NULL,
            priority    INTEGER NOT NULL,
            is_active   INTEGER NOT NULL DEFAULT 1,
            rule_json   TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_rules_scope_active
            ON correlation_rules(scope_key, is_active, tier, priority);
        ",
    )
}
