//! Migration runner
//!
//! Brings a database from its recorded `user_version` up to a requested
//! version. Each pending migration runs in its own transaction together
//! with its `schema_version` row and the `user_version` bump, so a step is
//! applied exactly once.

use crate::errors::{
    checksum_mismatch, migration_error, unavailable, version_too_new, Result,
};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{get_migrations, LATEST_VERSION};
use rusqlite::{Connection, OptionalExtension};

/// Apply all pending migrations to the database
///
/// Returns the schema version after the run.
///
/// # Errors
///
/// See [`apply_migrations_to`].
pub fn apply_migrations(conn: &mut Connection) -> Result<u32> {
    apply_migrations_to(conn, LATEST_VERSION)
}

/// Apply pending migrations up to and including `target`
///
/// # Errors
///
/// `StoreUnavailable` when the recorded version is newer than `target`,
/// when `target` is beyond the embedded migrations, when an applied
/// migration's checksum no longer matches, or when a migration fails.
pub fn apply_migrations_to(conn: &mut Connection, target: u32) -> Result<u32> {
    if target > LATEST_VERSION {
        return Err(migration_error(
            &format!("v{}", target),
            &format!("no migration available (latest is v{})", LATEST_VERSION),
        ));
    }

    create_schema_version_table(conn)?;

    let recorded = current_version(conn)?;
    if recorded > target {
        return Err(version_too_new(recorded, target));
    }

    let migrations = get_migrations();

    for migration in migrations.iter().filter(|m| m.version <= recorded) {
        verify_checksum(conn, migration.id, migration.sql)?;
    }

    for migration in migrations
        .iter()
        .filter(|m| m.version > recorded && m.version <= target)
    {
        apply_migration(conn, migration.version, migration.id, migration.sql)?;
    }

    current_version(conn)
}

/// Read the schema version recorded in the database (0 for a new file)
///
/// # Errors
///
/// `StoreUnavailable` if the pragma cannot be read, which is how SQLite
/// reports a file that is not a database.
pub fn current_version(conn: &Connection) -> Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| unavailable("read user_version", e))
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            version INTEGER NOT NULL,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| unavailable("create schema_version", e))?;

    Ok(())
}

fn verify_checksum(conn: &Connection, migration_id: &str, sql: &str) -> Result<()> {
    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| unavailable("read schema_version", e))?;

    let expected = compute_checksum(sql);
    match recorded {
        Some(actual) if actual != expected => {
            Err(checksum_mismatch(migration_id, &expected, &actual))
        }
        Some(_) => Ok(()),
        None => Err(migration_error(
            migration_id,
            "recorded as applied by user_version but missing from schema_version",
        )),
    }
}

/// Apply a single migration inside its own transaction
fn apply_migration(conn: &mut Connection, version: u32, migration_id: &str, sql: &str) -> Result<()> {
    tracing::debug!(migration_id, version, "applying migration");

    let checksum = compute_checksum(sql);

    let tx = conn
        .transaction()
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    tx.execute_batch(sql)
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (version, migration_id, applied_at, checksum) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![version, migration_id, now, checksum],
    )
    .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    tx.pragma_update(None, "user_version", version)
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    tx.commit()
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    Ok(())
}
