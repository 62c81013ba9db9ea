//! Path and validation extractors for API routes

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::types::{ErrorBody, MAX_ID_LENGTH};

/// Validate entity ID length
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LENGTH
}

/// Single `{id}` path segment, length-checked
#[derive(Debug)]
pub struct IdPath(pub String);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;
        if !is_valid_id(&id) {
            return Err(ValidationRejection::InvalidId);
        }
        Ok(Self(id))
    }
}

#[derive(Debug, Deserialize)]
struct MemberPathRaw {
    id: String,
    user_id: String,
}

/// `{id}/members/{user_id}` path
#[derive(Debug)]
pub struct MemberPath {
    pub board_id: String,
    pub user_id: String,
}

impl<S> FromRequestParts<S> for MemberPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<MemberPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;
        if !is_valid_id(&raw.id) || !is_valid_id(&raw.user_id) {
            return Err(ValidationRejection::InvalidId);
        }
        Ok(Self {
            board_id: raw.id,
            user_id: raw.user_id,
        })
    }
}

/// Validation rejection with structured error response
pub enum ValidationRejection {
    /// Failed to parse path parameters
    Path(PathRejection),
    /// Empty or oversized ID
    InvalidId,
    /// Failed to parse JSON body
    Json(JsonRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::Path(rejection) => ("PATH_PARSE_ERROR", rejection.body_text()),
            Self::InvalidId => (
                "INVALID_ID",
                format!("Invalid id: must be 1-{} characters", MAX_ID_LENGTH),
            ),
            Self::Json(rejection) => ("JSON_PARSE_ERROR", rejection.body_text()),
            Self::Validation(errors) => ("VALIDATION_ERROR", format_validation_errors(&errors)),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// JSON body extractor with automatic validation.
///
/// Deserializes JSON body and validates it using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("ckx1"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(&"a".repeat(MAX_ID_LENGTH + 1)));
    }
}
