//! Shared API types
//!
//! Error responses are `{"error": message, "code": CODE}` with the status taken
//! from the error kind.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::ServiceError;

/// Maximum ID length accepted in paths
pub const MAX_ID_LENGTH: usize = 256;

/// Unix seconds to UTC timestamp
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code().to_string();
        match e {
            ServiceError::Validation(message) => Self::BadRequest { code, message },
            ServiceError::Unauthorized(message) => Self::Unauthorized { code, message },
            ServiceError::PermissionDenied(message) => Self::Forbidden { code, message },
            ServiceError::NotFound(message) => Self::NotFound { code, message },
            ServiceError::Conflict(message) => Self::Conflict { code, message },
            ServiceError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                Self::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Unauthorized { code, message } => (StatusCode::UNAUTHORIZED, code, message),
            Self::Forbidden { code, message } => (StatusCode::FORBIDDEN, code, message),
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            Self::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}

/// Request body for moving a section or column
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveRequest {
    /// Target 0-based rank; values past the end land last
    #[validate(range(min = 0, message = "order must be a non-negative integer"))]
    pub order: i64,
}

/// Result of a rank move
#[derive(Debug, Serialize, ToSchema)]
pub struct MoveResponse {
    pub id: String,
    /// Parent after the move (board for sections and columns, section for items)
    pub parent_id: String,
    pub order: i64,
    pub moved: bool,
}

impl From<crate::data::types::MoveOutcome> for MoveResponse {
    fn from(outcome: crate::data::types::MoveOutcome) -> Self {
        Self {
            moved: outcome.moved(),
            id: outcome.id,
            parent_id: outcome.new_parent_id,
            order: outcome.new_position,
        }
    }
}
