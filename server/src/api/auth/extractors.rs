//! Principal extractors for Axum handlers
//!
//! ```ignore
//! pub async fn list_boards(State(state): State<BoardApiState>, auth: Auth) -> Result<..., ApiError> {
//!     let boards = state.services.boards.list_boards(&auth.principal).await?;
//!     ...
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::context::CurrentUser;
use crate::api::types::ApiError;
use crate::data::types::UserRow;
use crate::domain::Principal;

/// Rejection type for auth extractors
pub enum AuthRejection {
    /// Authorization failed
    Auth(ApiError),
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(e) => e.into_response(),
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

fn current_user(parts: &Parts) -> Result<CurrentUser, AuthRejection> {
    parts
        .extensions
        .get::<CurrentUser>()
        .cloned()
        .ok_or(AuthRejection::MissingContext)
}

/// Any authenticated, active user
pub struct Auth {
    pub user: UserRow,
    pub principal: Principal,
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, principal } = current_user(parts)?;
        Ok(Self { user, principal })
    }
}

/// Authenticated user with the ADMIN global role
pub struct Admin {
    pub principal: Principal,
}

impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = current_user(parts)?;
        if !current.principal.is_admin() {
            return Err(AuthRejection::Auth(ApiError::forbidden(
                "PERMISSION_DENIED",
                "Administrator access required",
            )));
        }
        Ok(Self {
            principal: current.principal,
        })
    }
}
