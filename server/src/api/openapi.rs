//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{
    auth, boards, columns, comments, health, items, members, sections, users,
};
use crate::api::types::{ErrorBody, MoveRequest, MoveResponse};
use crate::data::types::{ActivityAction, BoardRole, ColumnType, EntityKind, UserRole};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Shared task boards with ordered sections, custom columns and an activity log"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "boards", description = "Boards and their activity log"),
        (name = "sections", description = "Ordered sections of a board"),
        (name = "columns", description = "Custom column definitions"),
        (name = "items", description = "Items and their column values"),
        (name = "comments", description = "Item comments"),
        (name = "members", description = "Board membership")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Users
        users::list_users,
        users::create_user,
        users::update_user,
        users::deactivate_user,
        // Boards
        boards::list_boards,
        boards::create_board,
        boards::get_board,
        boards::rename_board,
        boards::delete_board,
        boards::list_activity,
        // Sections
        sections::list_sections,
        sections::create_section,
        sections::rename_section,
        sections::delete_section,
        sections::move_section,
        // Columns
        columns::list_columns,
        columns::define_column,
        columns::update_column,
        columns::delete_column,
        columns::move_column,
        // Items
        items::list_board_items,
        items::create_item,
        items::get_item,
        items::update_item,
        items::delete_item,
        items::move_item,
        // Comments
        comments::list_comments,
        comments::create_comment,
        comments::delete_comment,
        // Members
        members::list_members,
        members::upsert_member,
        members::remove_member,
    ),
    components(schemas(
        ErrorBody,
        MoveRequest,
        MoveResponse,
        UserRole,
        BoardRole,
        ColumnType,
        ActivityAction,
        EntityKind,
        health::HealthResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::LogoutResponse,
        users::types::UserDto,
        users::types::CreateUserRequest,
        users::types::UpdateUserRequest,
        boards::types::BoardDto,
        boards::types::BoardNameRequest,
        boards::types::ActorDto,
        boards::types::ActivityDto,
        sections::types::SectionDto,
        sections::types::SectionNameRequest,
        columns::types::ColumnDto,
        columns::types::CreateColumnRequest,
        columns::types::UpdateColumnRequest,
        items::types::ItemDto,
        items::types::SectionItemsDto,
        items::types::CreateItemRequest,
        items::types::UpdateItemRequest,
        items::types::MoveItemRequest,
        comments::types::CommentDto,
        comments::types::CreateCommentRequest,
        members::types::MemberDto,
        members::types::UpsertMemberRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Taskboard API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/login",
            "/api/v1/boards/{id}/members/{user_id}",
            "/api/v1/items/{id}/move",
            "/api/v1/columns/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
