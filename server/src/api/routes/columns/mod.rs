//! Custom column API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::{ApiError, MoveRequest, MoveResponse};
use crate::domain::Services;

use types::{ColumnDto, CreateColumnRequest, UpdateColumnRequest};

/// Shared state for Columns API endpoints
#[derive(Clone)]
pub struct ColumnsApiState {
    pub services: Services,
}

/// Build Columns API routes
pub fn routes(services: Services) -> Router<()> {
    let state = ColumnsApiState { services };

    Router::new()
        .route("/boards/{id}/columns", get(list_columns).post(define_column))
        .route("/columns/{id}", patch(update_column).delete(delete_column))
        .route("/columns/{id}/move", post(move_column))
        .with_state(state)
}

/// List a board's columns in order
#[utoipa::path(
    get,
    path = "/api/v1/boards/{id}/columns",
    tag = "columns",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Columns in order", body = Vec<ColumnDto>),
        (status = 403, description = "No access to this board")
    )
)]
pub async fn list_columns(
    State(state): State<ColumnsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<Json<Vec<ColumnDto>>, ApiError> {
    let columns = state
        .services
        .columns
        .list_columns(&auth.principal, &board_id)
        .await?;
    Ok(Json(columns.into_iter().map(ColumnDto::from).collect()))
}

/// Define a custom column on a board
#[utoipa::path(
    post,
    path = "/api/v1/boards/{id}/columns",
    tag = "columns",
    params(("id" = String, Path, description = "Board ID")),
    request_body = CreateColumnRequest,
    responses(
        (status = 201, description = "Column defined", body = ColumnDto),
        (status = 400, description = "Invalid definition"),
        (status = 403, description = "Edit access required"),
        (status = 409, description = "Column name already used on this board")
    )
)]
pub async fn define_column(
    State(state): State<ColumnsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
    ValidatedJson(body): ValidatedJson<CreateColumnRequest>,
) -> Result<(StatusCode, Json<ColumnDto>), ApiError> {
    let column = state
        .services
        .columns
        .define_column(&auth.principal, &board_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ColumnDto::from(column))))
}

/// Update a column definition
///
/// Stored values the new definition no longer accepts are removed.
#[utoipa::path(
    patch,
    path = "/api/v1/columns/{id}",
    tag = "columns",
    params(("id" = String, Path, description = "Column ID")),
    request_body = UpdateColumnRequest,
    responses(
        (status = 200, description = "Column updated", body = ColumnDto),
        (status = 400, description = "Invalid definition"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Column not found"),
        (status = 409, description = "Column name already used on this board")
    )
)]
pub async fn update_column(
    State(state): State<ColumnsApiState>,
    auth: Auth,
    IdPath(column_id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateColumnRequest>,
) -> Result<Json<ColumnDto>, ApiError> {
    let column = state
        .services
        .columns
        .update_column(&auth.principal, &column_id, body.into())
        .await?;
    Ok(Json(ColumnDto::from(column)))
}

/// Delete a column and its stored values
#[utoipa::path(
    delete,
    path = "/api/v1/columns/{id}",
    tag = "columns",
    params(("id" = String, Path, description = "Column ID")),
    responses(
        (status = 204, description = "Column deleted"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Column not found")
    )
)]
pub async fn delete_column(
    State(state): State<ColumnsApiState>,
    auth: Auth,
    IdPath(column_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .columns
        .delete_column(&auth.principal, &column_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a column to a new rank within its board
#[utoipa::path(
    post,
    path = "/api/v1/columns/{id}/move",
    tag = "columns",
    params(("id" = String, Path, description = "Column ID")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Final placement", body = MoveResponse),
        (status = 400, description = "Negative order"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Column not found")
    )
)]
pub async fn move_column(
    State(state): State<ColumnsApiState>,
    auth: Auth,
    IdPath(column_id): IdPath,
    ValidatedJson(body): ValidatedJson<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let outcome = state
        .services
        .columns
        .move_column(&auth.principal, &column_id, body.order)
        .await?;
    Ok(Json(MoveResponse::from(outcome)))
}
