//! v001 (per-root store): files, clusters, events.

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

        CREATE TABLE IF NOT EXISTS files (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            original_path   TEXT NOT NULL UNIQUE,
            current_path    TEXT NOT NULL,
            filename        TEXT NOT NULL,
            content_hash    TEXT NOT NULL,
            file_type       TEXT,
            size_bytes      INTEGER NOT NULL DEFAULT 0,
            word_count      INTEGER NOT NULL DEFAULT 0,
            page_count      INTEGER NOT NULL DEFAULT 0,
            summary         TEXT,
            embedding       BLOB,
            embed_model     TEXT,
            cluster_id      INTEGER NOT NULL DEFAULT -1,
            umap_x          REAL NOT NULL DEFAULT 0,
            umap_y          REAL NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            modified_at     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_files_hash ON files(content_hash);
        CREATE INDEX IF NOT EXISTS idx_files_cluster ON files(cluster_id);
        CREATE INDEX IF NOT EXISTS idx_files_current_path ON files(current_path);

        CREATE TABLE IF NOT EXISTS clusters (
            id              INTEGER PRIMARY KEY,
            name            TEXT NOT NULL,
            description     TEXT,
            folder_path     TEXT NOT NULL,
            centroid        BLOB,
            file_count      INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id         INTEGER,
            event_type      TEXT NOT NULL,
            detail          TEXT,
            created_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_events_created ON events(created_at);

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        ",
    )
    .map_err(to_err)?;
    Ok(())
}
