//! Error helpers for fixturex-store
//!
//! Store failures surface as `FixtureError::Persistence`, the same error the
//! in-memory collection reports.

use fixturex_core::errors::FixtureError;
use rusqlite::ErrorCode;

/// Result type alias using FixtureError
pub type Result<T> = std::result::Result<T, FixtureError>;

/// Collection name used for failures outside any collection
pub const STORE: &str = "sqlite";

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> FixtureError {
    in_collection(STORE)(err)
}

/// Map rusqlite errors raised while working on `collection`
pub fn in_collection(collection: &str) -> impl Fn(rusqlite::Error) -> FixtureError + '_ {
    move |err| FixtureError::persistence(collection, err.to_string())
}

/// Whether `err` is a uniqueness/primary key violation
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation))
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> FixtureError {
    FixtureError::persistence(
        STORE,
        format!("Migration {} failed: {}", migration_id, reason),
    )
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> FixtureError {
    FixtureError::persistence(
        STORE,
        format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    )
}
