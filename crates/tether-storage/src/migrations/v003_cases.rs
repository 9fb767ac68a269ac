//! v003: correlation_cases, indexed on status for the review queue.
//!
//! The partial unique index on (source_key, target_key) holds the
//! one-open-case-per-pair invariant at the schema level: repeated
//! correlation runs refresh the existing pending case instead of
//! queueing duplicates.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS correlation_cases (
            id                TEXT PRIMARY KEY,
            status            TEXT NOT NULL,
            candidate_id      TEXT NOT NULL,
            candidate_json    TEXT NOT NULL,
            source_key        TEXT NOT NULL,
            target_key        TEXT NOT NULL,
            assigned_to       TEXT,
            reassign_reason   TEXT,
            resolution_reason TEXT,
            resolved_by       TEXT,
            resolved_at       TEXT,
            created_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_cases_status ON correlation_cases(status, created_at);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_cases_pending_pair
            ON correlation_cases(source_key, target_key) WHERE status = 'pending';
        ",
    )
}
