//! Single write connection behind `tokio::sync::Mutex`.
//! Writes are serialized; there is never write/write contention to arbitrate.

use std::path::Path;

use rusqlite::Connection;
use sefs_core::errors::{SefsResult, StorageError};
use tokio::sync::Mutex;

use super::pragmas::apply_pragmas;

fn open_err(path: &Path, e: rusqlite::Error) -> sefs_core::errors::SefsError {
    StorageError::OpenFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
    .into()
}

/// The single write connection for one database, protected by an async mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u32) -> SefsResult<Self> {
        let conn = Connection::open(path).map_err(|e| open_err(path, e))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> SefsResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::OpenFailed {
                path: ":memory:".to_string(),
                reason: e.to_string(),
            }
        })?;
        apply_pragmas(&conn, 5_000)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and run a closure against the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> SefsResult<T>
    where
        F: FnOnce(&Connection) -> SefsResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Synchronous access for startup-time migrations, before any async
    /// runtime work is in flight.
    pub fn with_conn_sync<F, T>(&self, f: F) -> SefsResult<T>
    where
        F: FnOnce(&Connection) -> SefsResult<T>,
    {
        let guard = self.conn.blocking_lock();
        f(&guard)
    }
}
