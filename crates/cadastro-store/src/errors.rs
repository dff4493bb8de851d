//! Error handling for cadastro-store
//!
//! Classifies rusqlite errors into the `EmployeeError` taxonomy. This is
//! the only place that inspects SQLite result codes.

use cadastro_core::EmployeeError;
use rusqlite::ErrorCode;

/// Result type alias using EmployeeError
pub type Result<T> = std::result::Result<T, EmployeeError>;

const UNIQUE_FAILED_PREFIX: &str = "UNIQUE constraint failed: ";

/// The engine rejected opening or preparing the database
pub fn unavailable(operation: &str, err: rusqlite::Error) -> EmployeeError {
    EmployeeError::store_unavailable(format!("{} failed: {}", operation, err))
}

/// Engine error during a read or scan
pub fn from_rusqlite_read(err: rusqlite::Error) -> EmployeeError {
    EmployeeError::ReadFailed {
        reason: err.to_string(),
    }
}

/// Engine error during a mutation
///
/// Unique index rejections become `ConstraintViolation` naming the first
/// column of the violated index; everything else is `WriteFailed`.
pub fn from_rusqlite_write(err: rusqlite::Error) -> EmployeeError {
    match unique_violation_field(&err) {
        Some(field) => EmployeeError::ConstraintViolation { field },
        None => EmployeeError::WriteFailed {
            reason: err.to_string(),
        },
    }
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> EmployeeError {
    EmployeeError::store_unavailable(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> EmployeeError {
    EmployeeError::store_unavailable(format!(
        "Checksum mismatch for migration {}: expected {}, got {}",
        migration_id, expected, actual
    ))
}

/// The database was written by a newer schema than the one requested
pub fn version_too_new(recorded: u32, requested: u32) -> EmployeeError {
    EmployeeError::store_unavailable(format!(
        "Database schema version {} is newer than requested version {}",
        recorded, requested
    ))
}

fn unique_violation_field(err: &rusqlite::Error) -> Option<String> {
    let rusqlite::Error::SqliteFailure(code, Some(message)) = err else {
        return None;
    };
    if code.code != ErrorCode::ConstraintViolation {
        return None;
    }

    // "UNIQUE constraint failed: funcionarios.cpf[, funcionarios.x]"
    let columns = message.strip_prefix(UNIQUE_FAILED_PREFIX)?;
    let first = columns.split(',').next()?.trim();
    let column = first.rsplit('.').next().unwrap_or(first);
    Some(column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQLITE_CONSTRAINT_UNIQUE: std::os::raw::c_int = 2067;
    const SQLITE_CONSTRAINT_NOTNULL: std::os::raw::c_int = 1299;

    fn sqlite_failure(code: std::os::raw::c_int, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(code),
            Some(message.to_string()),
        )
    }

    #[test]
    fn test_unique_violation_maps_to_constraint_violation() {
        let err = sqlite_failure(
            SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed: funcionarios.telefone",
        );
        assert_eq!(
            from_rusqlite_write(err),
            EmployeeError::ConstraintViolation {
                field: "telefone".to_string()
            }
        );
    }

    #[test]
    fn test_not_null_violation_is_write_failed() {
        let err = sqlite_failure(
            SQLITE_CONSTRAINT_NOTNULL,
            "NOT NULL constraint failed: funcionarios.nome",
        );
        assert!(matches!(
            from_rusqlite_write(err),
            EmployeeError::WriteFailed { .. }
        ));
    }

    #[test]
    fn test_read_error_is_read_failed() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(
            from_rusqlite_read(err),
            EmployeeError::ReadFailed { .. }
        ));
    }
}
