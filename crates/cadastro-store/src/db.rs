//! Database connection management

use crate::errors::{unavailable, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Open a SQLite database at the given path, creating the file if needed
///
/// # Errors
///
/// `StoreUnavailable` if the file cannot be opened as a database.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| unavailable("open", e))
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
///
/// `StoreUnavailable` if SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| unavailable("open", e))
}

/// Configure a connection: WAL journal and a busy timeout for writers
/// from other processes
///
/// # Errors
///
/// `StoreUnavailable` if a pragma is rejected (typically a corrupt or
/// non-database file, which SQLite only detects on first access).
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(5000))
        .map_err(|e| unavailable("configure", e))?;

    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| unavailable("configure", e))?;
    tracing::debug!(journal_mode = %mode, "connection configured");

    Ok(())
}
