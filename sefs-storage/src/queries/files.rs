use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use sefs_core::errors::{SefsResult, StorageError};
use sefs_core::models::FileRecord;

use crate::codec::{decode_vector, encode_vector};

fn to_err(reason: impl ToString) -> sefs_core::errors::SefsError {
    StorageError::QueryFailed {
        reason: reason.to_string(),
    }
    .into()
}

fn row_to_file(row: &Row) -> rusqlite::Result<FileRecord> {
    let embedding_blob: Option<Vec<u8>> = row.get("embedding")?;
    let created_at: String = row.get("created_at")?;
    let modified_at: String = row.get("modified_at")?;
    Ok(FileRecord {
        id: row.get("id")?,
        original_path: row.get("original_path")?,
        current_path: row.get("current_path")?,
        filename: row.get("filename")?,
        content_hash: row.get("content_hash")?,
        file_type: row.get("file_type")?,
        size_bytes: row.get::<_, i64>("size_bytes")? as u64,
        word_count: row.get::<_, i64>("word_count")? as u32,
        page_count: row.get::<_, i64>("page_count")? as u32,
        summary: row.get("summary")?,
        embedding: embedding_blob.map(|b| decode_vector(&b)),
        embed_model: row.get("embed_model")?,
        cluster_id: row.get("cluster_id")?,
        umap_x: row.get("umap_x")?,
        umap_y: row.get("umap_y")?,
        created_at: parse_dt(&created_at),
        modified_at: parse_dt(&modified_at),
    })
}

fn parse_dt(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// `INSERT ... ON CONFLICT(original_path) DO UPDATE` — a single atomic
/// statement rather than select-then-branch, per the store's concurrency
/// contract.
pub fn upsert_file(conn: &Connection, file: &FileRecord) -> SefsResult<i64> {
    let embedding_blob = file.embedding.as_ref().map(|v| encode_vector(v));
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO files (
            original_path, current_path, filename, content_hash, file_type,
            size_bytes, word_count, page_count, summary, embedding, embed_model,
            cluster_id, umap_x, umap_y, created_at, modified_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        ON CONFLICT(original_path) DO UPDATE SET
            current_path = excluded.current_path,
            filename = excluded.filename,
            content_hash = excluded.content_hash,
            file_type = excluded.file_type,
            size_bytes = excluded.size_bytes,
            word_count = excluded.word_count,
            page_count = excluded.page_count,
            summary = excluded.summary,
            embedding = excluded.embedding,
            embed_model = excluded.embed_model,
            cluster_id = excluded.cluster_id,
            umap_x = excluded.umap_x,
            umap_y = excluded.umap_y,
            modified_at = excluded.modified_at",
        params![
            file.original_path,
            file.current_path,
            file.filename,
            file.content_hash,
            file.file_type,
            file.size_bytes as i64,
            file.word_count as i64,
            file.page_count as i64,
            file.summary,
            embedding_blob,
            file.embed_model,
            file.cluster_id,
            file.umap_x,
            file.umap_y,
            if file.id == 0 { now.clone() } else { file.created_at.to_rfc3339() },
            now,
        ],
    )
    .map_err(to_err)?;

    get_by_path(conn, &file.original_path)?
        .map(|f| f.id)
        .ok_or_else(|| StorageError::NotFound(file.original_path.clone()).into())
}

const SELECT_ALL: &str = "SELECT id, original_path, current_path, filename, content_hash,
    file_type, size_bytes, word_count, page_count, summary, embedding, embed_model,
    cluster_id, umap_x, umap_y, created_at, modified_at FROM files";

pub fn get_by_id(conn: &Connection, id: i64) -> SefsResult<Option<FileRecord>> {
    conn.query_row(
        &format!("{SELECT_ALL} WHERE id = ?1"),
        params![id],
        row_to_file,
    )
    .optional()
    .map_err(to_err)
}

pub fn get_by_path(conn: &Connection, original_path: &str) -> SefsResult<Option<FileRecord>> {
    conn.query_row(
        &format!("{SELECT_ALL} WHERE original_path = ?1"),
        params![original_path],
        row_to_file,
    )
    .optional()
    .map_err(to_err)
}

pub fn get_by_current_path(conn: &Connection, current_path: &str) -> SefsResult<Option<FileRecord>> {
    conn.query_row(
        &format!("{SELECT_ALL} WHERE current_path = ?1"),
        params![current_path],
        row_to_file,
    )
    .optional()
    .map_err(to_err)
}

pub fn get_by_hash(conn: &Connection, content_hash: &str) -> SefsResult<Option<FileRecord>> {
    conn.query_row(
        &format!("{SELECT_ALL} WHERE content_hash = ?1 ORDER BY id LIMIT 1"),
        params![content_hash],
        row_to_file,
    )
    .optional()
    .map_err(to_err)
}

pub fn get_all(conn: &Connection) -> SefsResult<Vec<FileRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_ALL} ORDER BY id")).map_err(to_err)?;
    let rows = stmt
        .query_map([], row_to_file)
        .map_err(to_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_err)?;
    Ok(rows)
}

pub fn update_paths(
    conn: &Connection,
    id: i64,
    current_path: &str,
    filename: &str,
) -> SefsResult<()> {
    conn.execute(
        "UPDATE files SET current_path = ?1, filename = ?2, modified_at = ?3 WHERE id = ?4",
        params![current_path, filename, Utc::now().to_rfc3339(), id],
    )
    .map_err(to_err)?;
    Ok(())
}

pub fn update_embedding(
    conn: &Connection,
    id: i64,
    embedding: &[f32],
    model_tag: &str,
) -> SefsResult<()> {
    conn.execute(
        "UPDATE files SET embedding = ?1, embed_model = ?2, modified_at = ?3 WHERE id = ?4",
        params![encode_vector(embedding), model_tag, Utc::now().to_rfc3339(), id],
    )
    .map_err(to_err)?;
    Ok(())
}

pub fn update_cluster(
    conn: &Connection,
    id: i64,
    cluster_id: i64,
    umap_x: f64,
    umap_y: f64,
) -> SefsResult<()> {
    conn.execute(
        "UPDATE files SET cluster_id = ?1, umap_x = ?2, umap_y = ?3 WHERE id = ?4",
        params![cluster_id, umap_x, umap_y, id],
    )
    .map_err(to_err)?;
    Ok(())
}

pub fn bulk_update_clusters(
    conn: &Connection,
    assignments: &[(i64, i64, f64, f64)],
) -> SefsResult<()> {
    conn.execute_batch("BEGIN IMMEDIATE").map_err(to_err)?;
    let result = (|| -> SefsResult<()> {
        let mut stmt = conn
            .prepare("UPDATE files SET cluster_id = ?1, umap_x = ?2, umap_y = ?3 WHERE id = ?4")
            .map_err(to_err)?;
        for (id, cluster_id, x, y) in assignments {
            stmt.execute(params![cluster_id, x, y, id]).map_err(to_err)?;
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

pub fn delete(conn: &Connection, id: i64) -> SefsResult<()> {
    conn.execute("DELETE FROM files WHERE id = ?1", params![id])
        .map_err(to_err)?;
    Ok(())
}
