//! Board API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::timestamp;
use crate::data::types::{ActivityAction, ActivityRow, BoardRole, BoardRow, BoardWithRole, EntityKind};

/// Board DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardDto {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    /// Caller's role on the board
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<BoardRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BoardRow> for BoardDto {
    fn from(row: BoardRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
            role: None,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

impl From<BoardWithRole> for BoardDto {
    fn from(row: BoardWithRole) -> Self {
        Self {
            role: Some(row.role),
            ..Self::from(row.board)
        }
    }
}

/// Request body for creating or renaming a board
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BoardNameRequest {
    #[validate(length(min = 1, max = 200, message = "Board name must be 1-200 characters"))]
    pub name: String,
}

/// Who performed a logged action
#[derive(Debug, Serialize, ToSchema)]
pub struct ActorDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Activity log entry
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityDto {
    pub id: String,
    pub board_id: String,
    pub action: ActivityAction,
    pub entity_type: EntityKind,
    pub entity_id: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: ActorDto,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityDto {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id,
            board_id: row.board_id,
            action: row.action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            old_value: row.old_value,
            new_value: row.new_value,
            actor: ActorDto {
                id: row.actor_id,
                name: row.actor_name,
                email: row.actor_email,
            },
            created_at: timestamp(row.created_at),
        }
    }
}
