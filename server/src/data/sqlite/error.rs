//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Invalid stored value: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl SqliteError {
    /// Map a unique-constraint violation to `Conflict(message)`, anything else to `Database`
    pub fn unique_as_conflict(e: sqlx::Error, message: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(message.to_string())
            }
            _ => Self::Database(e),
        }
    }

    pub fn decode(column: &str, value: &str) -> Self {
        Self::Decode(format!("{column} = {value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = SqliteError::MigrationFailed {
            version: 2,
            name: "add_activity_index".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_activity_index) failed: syntax error"
        );
    }

    #[test]
    fn test_non_unique_error_stays_database() {
        let err = SqliteError::unique_as_conflict(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, SqliteError::Database(_)));
    }

    #[test]
    fn test_decode_message() {
        let err = SqliteError::decode("role", "ROOT");
        assert_eq!(err.to_string(), "Invalid stored value: role = \"ROOT\"");
    }
}
