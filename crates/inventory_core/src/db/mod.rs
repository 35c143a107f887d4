//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Open and configure the SQLite storage session for inventory core.
//! - Ensure the inventory schema exists before any data access.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write inventory data before the schema is ensured.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;
mod session;

pub use open::{open_db, open_db_in_memory};
pub use session::StorageSession;

/// File name of the inventory store, resolved against the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "management.db";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
