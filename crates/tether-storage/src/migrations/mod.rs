//! Schema migrations, applied in order on open. All idempotent.

pub mod v001_rules;
pub mod v002_thresholds;
pub mod v003_cases;
pub mod v004_links;

use rusqlite::Connection;

use tether_core::errors::{StorageError, TetherResult};

pub fn run_migrations(conn: &Connection) -> TetherResult<()> {
    apply(conn, 1, v001_rules::migrate)?;
    apply(conn, 2, v002_thresholds::migrate)?;
    apply(conn, 3, v003_cases::migrate)?;
    apply(conn, 4, v004_links::migrate)?;
    Ok(())
}

/// Run one migration, attributing any failure to its schema version.
fn apply(
    conn: &Connection,
    version: u32,
    migrate: fn(&Connection) -> rusqlite::Result<()>,
) -> TetherResult<()> {
    migrate(conn).map_err(|e| {
        StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        }
        .into()
    })
}
