//! Item API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::{ApiError, MoveResponse};
use crate::domain::Services;

use types::{
    CreateItemRequest, ItemDto, MoveItemRequest, SectionItemsDto, UpdateItemRequest, value_input,
};

/// Shared state for Items API endpoints
#[derive(Clone)]
pub struct ItemsApiState {
    pub services: Services,
}

/// Build Items API routes
pub fn routes(services: Services) -> Router<()> {
    let state = ItemsApiState { services };

    Router::new()
        .route("/boards/{id}/items", get(list_board_items))
        .route("/sections/{id}/items", post(create_item))
        .route(
            "/items/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/items/{id}/move", post(move_item))
        .with_state(state)
}

/// Board view: sections in order, each with its items, values and comments
#[utoipa::path(
    get,
    path = "/api/v1/boards/{id}/items",
    tag = "items",
    params(("id" = String, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Sections with items", body = Vec<SectionItemsDto>),
        (status = 403, description = "No access to this board")
    )
)]
pub async fn list_board_items(
    State(state): State<ItemsApiState>,
    auth: Auth,
    IdPath(board_id): IdPath,
) -> Result<Json<Vec<SectionItemsDto>>, ApiError> {
    let sections = state
        .services
        .items
        .list_board_items(&auth.principal, &board_id)
        .await?;
    Ok(Json(sections.into_iter().map(SectionItemsDto::from).collect()))
}

/// Append an item to a section
#[utoipa::path(
    post,
    path = "/api/v1/sections/{id}/items",
    tag = "items",
    params(("id" = String, Path, description = "Section ID")),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemDto),
        (status = 400, description = "Invalid title or value"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Section not found")
    )
)]
pub async fn create_item(
    State(state): State<ItemsApiState>,
    auth: Auth,
    IdPath(section_id): IdPath,
    ValidatedJson(body): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    let values = value_input(body.values)?;
    let item = state
        .services
        .items
        .create_item(&auth.principal, &section_id, &body.title, values)
        .await?;
    Ok((StatusCode::CREATED, Json(ItemDto::from(item))))
}

/// Get an item
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item", body = ItemDto),
        (status = 403, description = "No access to this board"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<ItemsApiState>,
    auth: Auth,
    IdPath(item_id): IdPath,
) -> Result<Json<ItemDto>, ApiError> {
    let item = state
        .services
        .items
        .get_item(&auth.principal, &item_id)
        .await?;
    Ok(Json(ItemDto::from(item)))
}

/// Update an item's title and/or values
#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemDto),
        (status = 400, description = "Invalid title or value"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<ItemsApiState>,
    auth: Auth,
    IdPath(item_id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateItemRequest>,
) -> Result<Json<ItemDto>, ApiError> {
    let values = value_input(body.values)?;
    let item = state
        .services
        .items
        .update_item(&auth.principal, &item_id, body.title.as_deref(), values)
        .await?;
    Ok(Json(ItemDto::from(item)))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<ItemsApiState>,
    auth: Auth,
    IdPath(item_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .items
        .delete_item(&auth.principal, &item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move an item within its section or to another section of the board
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/move",
    tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    request_body = MoveItemRequest,
    responses(
        (status = 200, description = "Final placement", body = MoveResponse),
        (status = 400, description = "Negative order or section on another board"),
        (status = 403, description = "Edit access required"),
        (status = 404, description = "Item or section not found")
    )
)]
pub async fn move_item(
    State(state): State<ItemsApiState>,
    auth: Auth,
    IdPath(item_id): IdPath,
    ValidatedJson(body): ValidatedJson<MoveItemRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let outcome = state
        .services
        .items
        .move_item(
            &auth.principal,
            &item_id,
            body.section_id.as_deref(),
            body.order,
        )
        .await?;
    Ok(Json(MoveResponse::from(outcome)))
}
