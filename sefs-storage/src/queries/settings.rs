use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};
use sefs_core::errors::{SefsResult, StorageError};

fn to_err(reason: impl ToString) -> sefs_core::errors::SefsError {
    StorageError::QueryFailed {
        reason: reason.to_string(),
    }
    .into()
}

pub fn get(conn: &Connection, key: &str) -> SefsResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_err)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> SefsResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(to_err)?;
    Ok(())
}

pub fn get_all(conn: &Connection) -> SefsResult<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings").map_err(to_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(to_err)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(to_err)?;
    Ok(rows)
}
