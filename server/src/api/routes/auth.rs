//! Authentication API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{Auth, AuthManager};
use crate::api::extractors::ValidatedJson;
use crate::api::routes::users::types::UserDto;
use crate::api::types::ApiError;
use crate::core::constants::SESSION_COOKIE_NAME;
use crate::domain::services::UserService;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token; also set as an HttpOnly session cookie
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Auth routes state
#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth_manager: Arc<AuthManager>,
    pub users: UserService,
}

/// Public auth routes (login, logout)
pub fn routes(auth_manager: Arc<AuthManager>, users: UserService) -> Router<()> {
    let state = AuthRoutesState {
        auth_manager,
        users,
    };

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .with_state(state)
}

/// Auth routes that need a principal
pub fn session_routes() -> Router<()> {
    Router::new().route("/auth/me", get(me))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    let issued = state.auth_manager.issue_token(&user).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue access token");
        ApiError::internal("Internal server error")
    })?;

    let cookie = Cookie::build((SESSION_COOKIE_NAME, issued.token.clone()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/api")
        .max_age(time::Duration::hours(state.auth_manager.ttl_hours() as i64))
        .build();

    tracing::debug!(user_id = %user.id, "User logged in");
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: UserDto::from(user),
        }),
    ))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Authenticated user", body = UserDto),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(auth: Auth) -> Json<UserDto> {
    Json(UserDto::from(auth.user))
}

/// Logout - clear session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/api")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.remove(cookie), Json(LogoutResponse { success: true }))
}
