//! Error type for data layer operations

use thiserror::Error;

/// Error type surfaced by repository implementations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Stored value could not be decoded into its domain type
    #[error("Invalid stored value: {0}")]
    Decode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unique constraint violated (duplicate email, duplicate column name)
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        use crate::data::sqlite::SqliteError;
        match e {
            SqliteError::Database(e) => Self::Sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
            SqliteError::Decode(msg) => Self::Decode(msg),
            SqliteError::Io(e) => Self::Io(e),
            SqliteError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteError;

    #[test]
    fn test_conflict_preserved_from_sqlite() {
        let err: DataError = SqliteError::Conflict("Email already in use".into()).into();
        assert!(matches!(err, DataError::Conflict(ref m) if m == "Email already in use"));
    }

    #[test]
    fn test_migration_failed_display() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 2,
            name: "add_index".into(),
            error: "syntax error".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_index) failed on sqlite: syntax error"
        );
    }
}
