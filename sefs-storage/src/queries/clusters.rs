use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use sefs_core::errors::{SefsResult, StorageError};
use sefs_core::models::ClusterRecord;

use crate::codec::{decode_vector, encode_vector};

fn to_err(reason: impl ToString) -> sefs_core::errors::SefsError {
    StorageError::QueryFailed {
        reason: reason.to_string(),
    }
    .into()
}

fn row_to_cluster(row: &Row) -> rusqlite::Result<ClusterRecord> {
    let centroid_blob: Option<Vec<u8>> = row.get("centroid")?;
    let created_at: String = row.get("created_at")?;
    Ok(ClusterRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        folder_path: row.get("folder_path")?,
        centroid: centroid_blob.map(|b| decode_vector(&b)),
        file_count: row.get::<_, i64>("file_count")? as usize,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Clear then upsert inside a single transaction, so a concurrent reader
/// (via the read pool) observes either the complete old set or the complete
/// new one, never a partial table.
pub fn replace_all(conn: &Connection, clusters: &[ClusterRecord]) -> SefsResult<()> {
    conn.execute_batch("BEGIN IMMEDIATE").map_err(to_err)?;
    let result = (|| -> SefsResult<()> {
        conn.execute("DELETE FROM clusters", []).map_err(to_err)?;
        for c in clusters {
            upsert_unchecked(conn, c)?;
        }
        Ok(())
    })();
    match result {
        Ok(()) => conn.execute_batch("COMMIT").map_err(to_err),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

pub fn clear(conn: &Connection) -> SefsResult<()> {
    conn.execute("DELETE FROM clusters", []).map_err(to_err)?;
    Ok(())
}

pub fn upsert(conn: &Connection, cluster: &ClusterRecord) -> SefsResult<()> {
    upsert_unchecked(conn, cluster)
}

fn upsert_unchecked(conn: &Connection, cluster: &ClusterRecord) -> SefsResult<()> {
    let centroid_blob = cluster.centroid.as_ref().map(|v| encode_vector(v));
    conn.execute(
        "INSERT INTO clusters (id, name, description, folder_path, centroid, file_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            folder_path = excluded.folder_path,
            centroid = excluded.centroid,
            file_count = excluded.file_count",
        params![
            cluster.id,
            cluster.name,
            cluster.description,
            cluster.folder_path,
            centroid_blob,
            cluster.file_count as i64,
            cluster.created_at.to_rfc3339(),
        ],
    )
    .map_err(to_err)?;
    Ok(())
}

pub fn get_all(conn: &Connection) -> SefsResult<Vec<ClusterRecord>> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, folder_path, centroid, file_count, created_at FROM clusters ORDER BY id")
        .map_err(to_err)?;
    let rows = stmt
        .query_map([], row_to_cluster)
        .map_err(to_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_err)?;
    Ok(rows)
}
