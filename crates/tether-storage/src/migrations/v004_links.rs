//! v004: identity_links, unique per (source, target) for idempotent commits.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS identity_links (
            source_key   TEXT NOT NULL,
            target_key   TEXT NOT NULL,
            source_json  TEXT NOT NULL,
            target_json  TEXT NOT NULL,
            committed_by TEXT NOT NULL,
            committed_at TEXT NOT NULL,
            PRIMARY KEY (source_key, target_key)
        );

        CREATE INDEX IF NOT EXISTS idx_links_target ON identity_links(target_key);
        ",
    )
}
