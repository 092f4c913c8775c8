use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use sefs_core::errors::{SefsResult, StorageError};
use sefs_core::models::{EventRecord, EventType};

fn to_err(reason: impl ToString) -> sefs_core::errors::SefsError {
    StorageError::QueryFailed {
        reason: reason.to_string(),
    }
    .into()
}

fn event_type_from_str(s: &str) -> EventType {
    match s {
        "processing_start" => EventType::ProcessingStart,
        "file_added" => EventType::FileAdded,
        "file_modified" => EventType::FileModified,
        "file_removed" => EventType::FileRemoved,
        "reclustering_start" => EventType::ReclusteringStart,
        "reclustering_end" => EventType::ReclusteringEnd,
        "scan_start" => EventType::ScanStart,
        "scan_complete" => EventType::ScanComplete,
        "reembedding_start" => EventType::ReembeddingStart,
        "reembedding_end" => EventType::ReembeddingEnd,
        "root_switching" => EventType::RootSwitching,
        _ => EventType::RootSwitched,
    }
}

fn row_to_event(row: &Row) -> rusqlite::Result<EventRecord> {
    let event_type: String = row.get("event_type")?;
    let created_at: String = row.get("created_at")?;
    Ok(EventRecord {
        id: row.get("id")?,
        file_id: row.get("file_id")?,
        event_type: event_type_from_str(&event_type),
        detail: row.get("detail")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

pub fn add(
    conn: &Connection,
    file_id: Option<i64>,
    event_type: EventType,
    detail: Option<&str>,
) -> SefsResult<()> {
    conn.execute(
        "INSERT INTO events (file_id, event_type, detail, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![file_id, event_type.as_str(), detail, Utc::now().to_rfc3339()],
    )
    .map_err(to_err)?;
    Ok(())
}

pub fn recent(conn: &Connection, limit: usize) -> SefsResult<Vec<EventRecord>> {
    let mut stmt = conn
        .prepare("SELECT id, file_id, event_type, detail, created_at FROM events ORDER BY id DESC LIMIT ?1")
        .map_err(to_err)?;
    let rows = stmt
        .query_map(params![limit as i64], row_to_event)
        .map_err(to_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_err)?;
    Ok(rows)
}
