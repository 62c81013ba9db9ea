//! Board member API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, MemberPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::domain::Services;

use types::{MemberDto, UpsertMemberRequest};

/// Shared state for Members API endpoints
#[derive(Clone)]
pub struct MembersApiState {
    pub services: Services,
}

/// Build Members API routes
pub fn routes(services: Services) -> Router<()> {
    let state = MembersApiState { services };

    Router::new()
        .route("/boards/{id}/members", get(list_members).put(upsert_member))
        .route("/boards/{id}/members/{user_id}", delete(remove_member))
        .with_state(state)
}

/// List a board's members, owner first
#[utoipa::path(
    get,
    path = "/api/v1/boards/{id}/members",
    tag = "members",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Members", body = Vec<MemberDto>),
        (status = 403, description = "No access to this board")
    )
)]
pub async fn list_members(
    State(state): State<MembersApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<Json<Vec<MemberDto>>, ApiError> {
    let members = state
        .services
        .members
        .list_members(&auth.principal, &board_id)
        .await?;
    Ok(Json(members.into_iter().map(MemberDto::from).collect()))
}

/// Add a user to a board by email, or change their role
#[utoipa::path(
    put,
    path = "/api/v1/boards/{id}/members",
    tag = "members",
    params(("id" = String, Path, description = "Board ID")),
    request_body = UpsertMemberRequest,
    responses(
        (status = 200, description = "Membership after the change", body = MemberDto),
        (status = 400, description = "Invalid role or target is the owner"),
        (status = 403, description = "Only the owner can manage members"),
        (status = 404, description = "User not found")
    )
)]
pub async fn upsert_member(
    State(state): State<MembersApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
    ValidatedJson(body): ValidatedJson<UpsertMemberRequest>,
) -> Result<Json<MemberDto>, ApiError> {
    let member = state
        .services
        .members
        .upsert_member(&auth.principal, &board_id, &body.email, body.role)
        .await?;
    Ok(Json(MemberDto::from(member)))
}

/// Remove a member from a board
#[utoipa::path(
    delete,
    path = "/api/v1/boards/{id}/members/{user_id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Board ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, description = "The owner cannot be removed"),
        (status = 403, description = "Only the owner can manage members"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn remove_member(
    State(state): State<MembersApiState>,
    auth: Auth,
    path: MemberPath,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .members
        .remove_member(&auth.principal, &path.board_id, &path.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
