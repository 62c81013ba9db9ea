//! Service error type
//!
//! Every domain operation returns [`ServiceError`]. The HTTP layer maps each kind
//! to a status code; internal details never leave the process.

use thiserror::Error;

use crate::data::DataError;
use crate::data::types::EntityKind;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or rejected input (400)
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    PermissionDenied(String),

    /// Referenced entity does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violated (409)
    #[error("{0}")]
    Conflict(String),

    /// Storage or infrastructure failure (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(kind: EntityKind) -> Self {
        Self::NotFound(format!("{} not found", kind.label()))
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<DataError> for ServiceError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Conflict(message) => Self::Conflict(message),
            other => Self::Internal(other.to_string()),
        }
    }
}
