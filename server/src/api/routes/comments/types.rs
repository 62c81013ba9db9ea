//! Comment API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::timestamp;
use crate::data::types::CommentRow;

/// Comment DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentDto {
    pub id: String,
    pub item_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentDto {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            item_id: row.item_id,
            author_id: row.author_id,
            author_name: row.author_name,
            content: row.content,
            created_at: timestamp(row.created_at),
        }
    }
}

/// Request body for posting a comment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 10000, message = "Comment must be 1-10000 characters"))]
    pub content: String,
}
