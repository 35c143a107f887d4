//! Inventory schema manager.
//!
//! # Responsibility
//! - Create the `inventory_items` table when absent.
//! - Stamp the schema version this binary writes.
//!
//! # Invariants
//! - Safe to run on every startup, against a fresh or an existing file.
//! - A file stamped with a newer version is rejected, never rewritten.
//! - Applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Returns the schema version known by this binary.
pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Ensures the inventory table and its identity constraint exist.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `DbError::Sqlite` when the storage cannot be read or written.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    // CREATE ... IF NOT EXISTS also repairs a stamped file whose table was dropped.
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    if current_version < SCHEMA_VERSION {
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    tx.commit()?;

    if current_version == SCHEMA_VERSION {
        debug!("event=schema_ensure module=db status=ok version={SCHEMA_VERSION} created=false");
    } else {
        info!(
            "event=schema_ensure module=db status=ok version={SCHEMA_VERSION} previous_version={current_version}"
        );
    }

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
