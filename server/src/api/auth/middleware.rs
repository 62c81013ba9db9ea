//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use super::context::CurrentUser;
use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::api::middleware::AllowedOrigins;
use crate::api::types::ErrorBody;
use crate::core::constants::SESSION_COOKIE_NAME;
use crate::domain::ServiceError;
use crate::domain::services::UserService;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: "Access token has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: "Invalid access token".to_string(),
        }
    }

    pub fn origin_not_allowed() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: "Request origin not allowed".to_string(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL",
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub users: UserService,
    pub allowed_origins: AllowedOrigins,
}

/// Token presented by the caller
enum Credential<'a> {
    Bearer(&'a str),
    Cookie(String),
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Origin of the request, falling back to the Referer's scheme and authority
fn request_origin(request: &Request) -> Option<String> {
    if let Some(origin) = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
    {
        return Some(origin.to_string());
    }

    let referer = request
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())?;
    match referer.parse::<Uri>() {
        Ok(uri) => match (uri.scheme_str(), uri.authority()) {
            (Some(scheme), Some(authority)) => Some(format!("{}://{}", scheme, authority)),
            _ => {
                tracing::debug!(referer = %referer, "Referer URL has no origin");
                None
            }
        },
        Err(_) => {
            tracing::debug!(referer = %referer, "Failed to parse Referer URL");
            None
        }
    }
}

/// Authentication middleware
///
/// Accepts `Authorization: Bearer <token>` first, then the session cookie.
/// Cookie-authenticated requests must come from an allowed origin.
///
/// Injects `CurrentUser` into request extensions.
pub async fn require_auth(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let credential = match bearer_token(&request) {
        Some(token) => Credential::Bearer(token),
        None => {
            let cookie = jar
                .get(SESSION_COOKIE_NAME)
                .ok_or_else(AuthError::required)?;
            Credential::Cookie(cookie.value().to_string())
        }
    };

    let token = match &credential {
        Credential::Bearer(token) => *token,
        Credential::Cookie(token) => {
            if let Some(origin) = request_origin(&request)
                && !state.allowed_origins.is_allowed(&origin)
            {
                tracing::warn!("Rejected request from disallowed origin: {}", origin);
                return Err(AuthError::origin_not_allowed());
            }
            token.as_str()
        }
    };

    let claims = state
        .auth_manager
        .validate_token(token)
        .map_err(|e| match e {
            JwtError::Expired => AuthError::expired(),
            _ => AuthError::invalid(),
        })?;

    let (user, principal) = state
        .users
        .principal_for(claims.user_id())
        .await
        .map_err(|e| match e {
            ServiceError::Unauthorized(message) => AuthError {
                message,
                ..AuthError::invalid()
            },
            other => {
                tracing::error!(error = %other, "Failed to resolve principal");
                AuthError::internal()
            }
        })?;

    request
        .extensions_mut()
        .insert(CurrentUser { user, principal });

    Ok(next.run(request).await)
}
