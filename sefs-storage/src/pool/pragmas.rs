//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, a 64MB page cache, a busy_timeout.

use rusqlite::Connection;
use sefs_core::errors::{SefsResult, StorageError};

fn to_err(reason: impl ToString) -> sefs_core::errors::SefsError {
    StorageError::QueryFailed {
        reason: reason.to_string(),
    }
    .into()
}

/// Apply write-side pragmas: WAL journaling so readers never block behind
/// the single writer, and a busy timeout so a momentarily-contended lock
/// surfaces as a retry rather than a hard error.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> SefsResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(to_err)?;
    Ok(())
}

/// Apply read-only pragmas to a connection in the read pool.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u32) -> SefsResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        "
    ))
    .map_err(to_err)?;
    Ok(())
}

/// Verify WAL mode actually took effect (it silently falls back to rollback
/// journaling on some filesystems, e.g. network mounts).
pub fn verify_wal_mode(conn: &Connection) -> SefsResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(to_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
