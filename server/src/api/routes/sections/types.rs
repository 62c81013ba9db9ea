//! Section API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::timestamp;
use crate::data::types::{SectionRow, SectionWithCount};

/// Section DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionDto {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SectionRow> for SectionDto {
    fn from(row: SectionRow) -> Self {
        Self {
            id: row.id,
            board_id: row.board_id,
            name: row.name,
            order: row.position,
            item_count: None,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

impl From<SectionWithCount> for SectionDto {
    fn from(row: SectionWithCount) -> Self {
        Self {
            item_count: Some(row.item_count),
            ..Self::from(row.section)
        }
    }
}

/// Request body for creating or renaming a section
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SectionNameRequest {
    #[validate(length(min = 1, max = 200, message = "Section name must be 1-200 characters"))]
    pub name: String,
}
