//! Section API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::{ApiError, MoveRequest, MoveResponse};
use crate::domain::Services;

use types::{SectionDto, SectionNameRequest};

/// Shared state for Sections API endpoints
#[derive(Clone)]
pub struct SectionsApiState {
    pub services: Services,
}

/// Build Sections API routes
pub fn routes(services: Services) -> Router<()> {
    let state = SectionsApiState { services };

    Router::new()
        .route(
            "/boards/{id}/sections",
            get(list_sections).post(create_section),
        )
        .route(
            "/sections/{id}",
            patch(rename_section).delete(delete_section),
        )
        .route("/sections/{id}/move", post(move_section))
        .with_state(state)
}

/// List a board's sections in order, with item counts
#[utoipa::path(
    get,
    path = "/api/v1/boards/{id}/sections",
    tag = "sections",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Sections in order", body = Vec<SectionDto>),
        (status = 403, description = "No access to this board")
    )
)]
pub async fn list_sections(
    State(state): State<SectionsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<Json<Vec<SectionDto>>, ApiError> {
    let sections = state
        .services
        .sections
        .list_sections(&auth.principal, &board_id)
        .await?;
    Ok(Json(sections.into_iter().map(SectionDto::from).collect()))
}

/// Append a section to a board
#[utoipa::path(
    post,
    path = "/api/v1/boards/{id}/sections",
    tag = "sections",
    params(("id" = String, Path, description = "Board ID")),
    request_body = SectionNameRequest,
    responses(
        (status = 201, description = "Section created", body = SectionDto),
        (status = 403, description = "Edit access required")
    )
)]
pub async fn create_section(
    State(state): State<SectionsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
    ValidatedJson(body): ValidatedJson<SectionNameRequest>,
) -> Result<(StatusCode, Json<SectionDto>), ApiError> {
    let section = state
        .services
        .sections
        .create_section(&auth.principal, &board_id, &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(SectionDto::from(section))))
}

/// Rename a section
#[utoipa::path(
    patch,
    path = "/api/v1/sections/{id}",
    tag = "sections",
    params(("id" = String, Path, description = "Section ID")),
    request_body = SectionNameRequest,
    responses(
        (status = 200, description = "Section renamed", body = SectionDto),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn rename_section(
    State(state): State<SectionsApiState>,
    auth: Auth,
    IdPath(section_id): IdPath,
    ValidatedJson(body): ValidatedJson<SectionNameRequest>,
) -> Result<Json<SectionDto>, ApiError> {
    let section = state
        .services
        .sections
        .rename_section(&auth.principal, &section_id, &body.name)
        .await?;
    Ok(Json(SectionDto::from(section)))
}

/// Delete a section and its items
#[utoipa::path(
    delete,
    path = "/api/v1/sections/{id}",
    tag = "sections",
    params(("id" = String, Path, description = "Section ID")),
    responses(
        (status = 204, description = "Section deleted"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn delete_section(
    State(state): State<SectionsApiState>,
    auth: Auth,
    IdPath(section_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .sections
        .delete_section(&auth.principal, &section_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a section to a new rank within its board
#[utoipa::path(
    post,
    path = "/api/v1/sections/{id}/move",
    tag = "sections",
    params(("id" = String, Path, description = "Section ID")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Final placement", body = MoveResponse),
        (status = 400, description = "Negative order"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn move_section(
    State(state): State<SectionsApiState>,
    auth: Auth,
    IdPath(section_id): IdPath,
    ValidatedJson(body): ValidatedJson<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let outcome = state
        .services
        .sections
        .move_section(&auth.principal, &section_id, body.order)
        .await?;
    Ok(Json(MoveResponse::from(outcome)))
}
