//! Board API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::data::types::BoardRole;
use crate::domain::Services;

use types::{ActivityDto, BoardDto, BoardNameRequest};

/// Shared state for Boards API endpoints
#[derive(Clone)]
pub struct BoardsApiState {
    pub services: Services,
}

/// Build Boards API routes
pub fn routes(services: Services) -> Router<()> {
    let state = BoardsApiState { services };

    Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/boards/{id}",
            get(get_board).patch(rename_board).delete(delete_board),
        )
        .route("/boards/{id}/logs", get(list_activity))
        .with_state(state)
}

/// List boards the caller owns or is a member of
#[utoipa::path(
    get,
    path = "/api/v1/boards",
    tag = "boards",
    responses(
        (status = 200, description = "Boards with the caller's role", body = Vec<BoardDto>)
    )
)]
pub async fn list_boards(
    State(state): State<BoardsApiState>,
    auth: Auth,
) -> Result<Json<Vec<BoardDto>>, ApiError> {
    let boards = state.services.boards.list_boards(&auth.principal).await?;
    Ok(Json(boards.into_iter().map(BoardDto::from).collect()))
}

/// Create a board owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/boards",
    tag = "boards",
    request_body = BoardNameRequest,
    responses(
        (status = 201, description = "Board created", body = BoardDto),
        (status = 400, description = "Invalid name")
    )
)]
pub async fn create_board(
    State(state): State<BoardsApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<BoardNameRequest>,
) -> Result<(StatusCode, Json<BoardDto>), ApiError> {
    let board = state
        .services
        .boards
        .create_board(&auth.principal, &body.name)
        .await?;
    let mut dto = BoardDto::from(board);
    dto.role = Some(BoardRole::Owner);
    Ok((StatusCode::CREATED, Json(dto)))
}

/// Get a board
#[utoipa::path(
    get,
    path = "/api/v1/boards/{id}",
    tag = "boards",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Board", body = BoardDto),
        (status = 403, description = "No access to this board"),
        (status = 404, description = "Board not found")
    )
)]
pub async fn get_board(
    State(state): State<BoardsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<Json<BoardDto>, ApiError> {
    let board = state
        .services
        .boards
        .get_board(&auth.principal, &board_id)
        .await?;
    Ok(Json(BoardDto::from(board)))
}

/// Rename a board
#[utoipa::path(
    patch,
    path = "/api/v1/boards/{id}",
    tag = "boards",
    params(("id" = String, Path, description = "Board ID")),
    request_body = BoardNameRequest,
    responses(
        (status = 200, description = "Board renamed", body = BoardDto),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Board not found")
    )
)]
pub async fn rename_board(
    State(state): State<BoardsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
    ValidatedJson(body): ValidatedJson<BoardNameRequest>,
) -> Result<Json<BoardDto>, ApiError> {
    let board = state
        .services
        .boards
        .rename_board(&auth.principal, &board_id, &body.name)
        .await?;
    Ok(Json(BoardDto::from(board)))
}

/// Delete a board and everything on it
#[utoipa::path(
    delete,
    path = "/api/v1/boards/{id}",
    tag = "boards",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 204, description = "Board deleted"),
        (status = 403, description = "Only the owner can delete a board"),
        (status = 404, description = "Board not found")
    )
)]
pub async fn delete_board(
    State(state): State<BoardsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .boards
        .delete_board(&auth.principal, &board_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Latest activity on a board, newest first
#[utoipa::path(
    get,
    path = "/api/v1/boards/{id}/logs",
    tag = "boards",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Up to 100 entries", body = Vec<ActivityDto>),
        (status = 403, description = "No access to this board")
    )
)]
pub async fn list_activity(
    State(state): State<BoardsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<Json<Vec<ActivityDto>>, ApiError> {
    let entries = state
        .services
        .boards
        .list_activity(&auth.principal, &board_id)
        .await?;
    Ok(Json(entries.into_iter().map(ActivityDto::from).collect()))
}
