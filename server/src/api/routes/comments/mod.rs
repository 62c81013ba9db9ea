//! Comment API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::domain::Services;

use types::{CommentDto, CreateCommentRequest};

/// Shared state for Comments API endpoints
#[derive(Clone)]
pub struct CommentsApiState {
    pub services: Services,
}

/// Build Comments API routes
pub fn routes(services: Services) -> Router<()> {
    let state = CommentsApiState { services };

    Router::new()
        .route(
            "/items/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/comments/{id}", delete(delete_comment))
        .with_state(state)
}

/// List an item's comments, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}/comments",
    tag = "comments",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Comments", body = Vec<CommentDto>),
        (status = 403, description = "No access to this board"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn list_comments(
    State(state): State<CommentsApiState>,
    auth: Auth,
    IdPath(item_id): IdPath,
) -> Result<Json<Vec<CommentDto>>, ApiError> {
    let comments = state
        .services
        .comments
        .list_comments(&auth.principal, &item_id)
        .await?;
    Ok(Json(comments.into_iter().map(CommentDto::from).collect()))
}

/// Comment on an item
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/comments",
    tag = "comments",
    params(("id" = String, Path, description = "Item ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn create_comment(
    State(state): State<CommentsApiState>,
    auth: Auth,
    IdPath(item_id): IdPath,
    ValidatedJson(body): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentDto>), ApiError> {
    let comment = state
        .services
        .comments
        .create_comment(&auth.principal, &item_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}

/// Delete a comment (author or board owner)
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    tag = "comments",
    params(("id" = String, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author or board owner"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<CommentsApiState>,
    auth: Auth,
    IdPath(comment_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .comments
        .delete_comment(&auth.principal, &comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
