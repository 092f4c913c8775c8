//! v002 (global store): key/value settings — provider, credentials, the
//! selected root folder. Lives in a separate physical database from the
//! per-root files/clusters/events store so switching roots never touches it.

use rusqlite::Connection;
use sefs_core::errors::{SefsResult, StorageError};

fn to_err(reason: impl ToString) -> sefs_core::errors::SefsError {
    StorageError::MigrationFailed {
        reason: reason.to_string(),
    }
    .into()
}

pub fn migrate(conn: &Connection) -> SefsResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS settings (
            key     TEXT PRIMARY KEY,
            value   TEXT NOT NULL
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        ",
    )
    .map_err(to_err)?;
    Ok(())
}
