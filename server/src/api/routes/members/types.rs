//! Board member API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::timestamp;
use crate::data::types::{BoardRole, MemberWithUser};

/// Member DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberDto {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: BoardRole,
    pub joined_at: DateTime<Utc>,
}

impl From<MemberWithUser> for MemberDto {
    fn from(row: MemberWithUser) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role: row.role,
            joined_at: timestamp(row.joined_at),
        }
    }
}

/// Request body for adding a member or changing their role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertMemberRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// EDITOR or VIEWER
    pub role: BoardRole,
}
