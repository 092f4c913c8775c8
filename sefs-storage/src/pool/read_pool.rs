//! A small fixed pool of read-only connections that may proceed concurrently
//! with the single writer (WAL readers never block on the writer).

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rusqlite::Connection;
use sefs_core::errors::{SefsResult, StorageError};
use tokio::sync::Mutex;

use super::pragmas::apply_read_pragmas;

fn open_err(path: &Path, e: rusqlite::Error) -> sefs_core::errors::SefsError {
    StorageError::OpenFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
    .into()
}

pub struct ReadPool {
    conns: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    pub fn open(path: &Path, size: usize, busy_timeout_ms: u32) -> SefsResult<Self> {
        let size = size.max(1);
        let mut conns = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open(path).map_err(|e| open_err(path, e))?;
            apply_read_pragmas(&conn, busy_timeout_ms)?;
            conns.push(Mutex::new(conn));
        }
        Ok(Self {
            conns,
            next: AtomicUsize::new(0),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory(size: usize) -> SefsResult<Self> {
        let size = size.max(1);
        let mut conns = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_in_memory().map_err(|e| {
                StorageError::OpenFailed {
                    path: ":memory:".to_string(),
                    reason: e.to_string(),
                }
            })?;
            apply_read_pragmas(&conn, 5_000)?;
            conns.push(Mutex::new(conn));
        }
        Ok(Self {
            conns,
            next: AtomicUsize::new(0),
        })
    }

    /// Check out the next connection round-robin and run a closure against it.
    pub async fn with_conn<F, T>(&self, f: F) -> SefsResult<T>
    where
        F: FnOnce(&Connection) -> SefsResult<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.conns.len();
        let guard = self.conns[idx].lock().await;
        f(&guard)
    }
}
