//! User API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::auth::{Admin, Auth};
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::domain::Services;

use types::{CreateUserRequest, UpdateUserRequest, UserDto};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub services: Services,
}

/// Build Users API routes
pub fn routes(services: Services) -> Router<()> {
    let state = UsersApiState { services };

    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", patch(update_user).delete(deactivate_user))
        .with_state(state)
}

/// List active users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Active users ordered by name", body = Vec<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator access required"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    admin: Admin,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state
        .services
        .users
        .create_user(&admin.principal, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// Update a user (self, or anyone as administrator)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 403, description = "Not allowed to update this user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    auth: Auth,
    IdPath(user_id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .services
        .users
        .update_user(&auth.principal, &user_id, body.into())
        .await?;
    Ok(Json(UserDto::from(user)))
}

/// Deactivate a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = UserDto),
        (status = 400, description = "Cannot deactivate yourself"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn deactivate_user(
    State(state): State<UsersApiState>,
    admin: Admin,
    IdPath(user_id): IdPath,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .services
        .users
        .deactivate_user(&admin.principal, &user_id)
        .await?;
    Ok(Json(UserDto::from(user)))
}
