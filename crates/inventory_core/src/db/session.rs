//! Owned storage session for the inventory store.
//!
//! # Responsibility
//! - Own the single SQLite connection for the process lifetime.
//! - Lend the connection to repositories without reopening per call.
//!
//! # Invariants
//! - A session is only handed out after the schema has been ensured.
//! - The handle is released exactly once: by `close()` or on drop.

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Open handle to the persistent inventory store.
///
/// Repositories borrow the connection through [`StorageSession::connection`],
/// so the compiler rejects any use after the session is closed or dropped.
#[derive(Debug)]
pub struct StorageSession {
    conn: Connection,
    mode: &'static str,
}

impl StorageSession {
    pub(crate) fn new(conn: Connection, mode: &'static str) -> Self {
        Self { conn, mode }
    }

    /// Borrows the underlying connection for repository use.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns `file` or `memory` depending on how the session was opened.
    pub fn mode(&self) -> &'static str {
        self.mode
    }

    /// Closes the session and reports any failure from the engine.
    ///
    /// On failure the connection is still dropped, which releases the handle.
    pub fn close(self) -> DbResult<()> {
        let started_at = Instant::now();
        let mode = self.mode;

        match self.conn.close() {
            Ok(()) => {
                info!(
                    "event=db_close module=db status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err((_conn, err)) => {
                error!(
                    "event=db_close module=db status=error mode={mode} error_code=db_close_failed error={err}"
                );
                Err(err.into())
            }
        }
    }
}
