//! User API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::timestamp;
use crate::data::types::{UserRole, UserRow};
use crate::domain::services::{NewUserInput, UserPatch};

/// User DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            is_active: row.is_active,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

/// Request body for creating a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Defaults to MEMBER
    pub role: Option<UserRole>,
}

impl From<CreateUserRequest> for NewUserInput {
    fn from(body: CreateUserRequest) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        }
    }
}

/// Request body for updating a user; omitted fields are unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        }
    }
}
