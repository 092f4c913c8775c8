mod v001_initial_schema;
mod v002_global_settings;

use rusqlite::Connection;
use sefs_core::errors::SefsResult;

/// Create the per-root schema (files/clusters/events) if it doesn't exist.
pub fn migrate_root(conn: &Connection) -> SefsResult<()> {
    v001_initial_schema::migrate(conn)
}

/// Create the global schema (settings) if it doesn't exist.
pub fn migrate_global(conn: &Connection) -> SefsResult<()> {
    v002_global_settings::migrate(conn)
}
