//! Column API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::timestamp;
use crate::data::types::{ColumnRow, ColumnType};
use crate::domain::fields::{ColumnInput, ColumnPatch};

/// Column DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ColumnDto {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub data_type: ColumnType,
    pub order: i64,
    /// Allowed values of a SELECT column, empty otherwise
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_expression: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ColumnRow> for ColumnDto {
    fn from(row: ColumnRow) -> Self {
        Self {
            id: row.id,
            board_id: row.board_id,
            name: row.name,
            data_type: row.data_type,
            order: row.position,
            options: row.options,
            formula_expression: row.formula_expression,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

/// Request body for defining a column
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateColumnRequest {
    #[validate(length(min = 1, max = 200, message = "Column name must be 1-200 characters"))]
    pub name: String,
    pub data_type: ColumnType,
    #[serde(default)]
    pub options: Vec<String>,
    pub formula_expression: Option<String>,
}

impl From<CreateColumnRequest> for ColumnInput {
    fn from(body: CreateColumnRequest) -> Self {
        Self {
            name: body.name,
            data_type: body.data_type,
            options: body.options,
            formula_expression: body.formula_expression,
        }
    }
}

/// Request body for updating a column; omitted fields are unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateColumnRequest {
    #[validate(length(min = 1, max = 200, message = "Column name must be 1-200 characters"))]
    pub name: Option<String>,
    pub data_type: Option<ColumnType>,
    pub options: Option<Vec<String>>,
    pub formula_expression: Option<String>,
}

impl From<UpdateColumnRequest> for ColumnPatch {
    fn from(body: UpdateColumnRequest) -> Self {
        Self {
            name: body.name,
            data_type: body.data_type,
            options: body.options,
            formula_expression: body.formula_expression,
        }
    }
}
