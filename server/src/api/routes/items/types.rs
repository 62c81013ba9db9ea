//! Item API types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::routes::comments::types::CommentDto;
use crate::api::types::{ApiError, timestamp};
use crate::domain::fields::ValueInput;
use crate::domain::services::{ItemView, SectionItems};

/// Item with its custom values keyed by column name
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDto {
    pub id: String,
    pub section_id: String,
    pub title: String,
    pub order: i64,
    pub values: BTreeMap<String, String>,
    /// Oldest first
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemView> for ItemDto {
    fn from(view: ItemView) -> Self {
        let ItemView {
            item,
            values,
            comments,
        } = view;
        Self {
            id: item.id,
            section_id: item.section_id,
            title: item.title,
            order: item.position,
            values,
            comments: comments.into_iter().map(CommentDto::from).collect(),
            created_at: timestamp(item.created_at),
            updated_at: timestamp(item.updated_at),
        }
    }
}

/// One section of the board view
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionItemsDto {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub items: Vec<ItemDto>,
}

impl From<SectionItems> for SectionItemsDto {
    fn from(group: SectionItems) -> Self {
        Self {
            id: group.section.id,
            name: group.section.name,
            order: group.section.position,
            items: group.items.into_iter().map(ItemDto::from).collect(),
        }
    }
}

/// Request body for creating an item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: String,
    /// Column ID to value; `""` or `null` leaves the column empty
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: BTreeMap<String, serde_json::Value>,
}

/// Request body for updating an item; omitted fields are unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: Option<String>,
    /// Column ID to value; `""` or `null` clears the column
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: BTreeMap<String, serde_json::Value>,
}

/// Request body for moving an item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveItemRequest {
    /// Target section on the same board; defaults to the current section
    pub section_id: Option<String>,
    #[validate(range(min = 0, message = "order must be a non-negative integer"))]
    pub order: i64,
}

/// Convert JSON values to stored strings
///
/// Strings pass through, numbers and booleans are stringified, `null` clears.
pub fn value_input(values: BTreeMap<String, serde_json::Value>) -> Result<ValueInput, ApiError> {
    values
        .into_iter()
        .map(|(column_id, value)| {
            let value = match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Bool(b) => Some(b.to_string()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(ApiError::bad_request(
                        "VALIDATION_ERROR",
                        format!("Value for column '{}' must be a scalar", column_id),
                    ));
                }
            };
            Ok((column_id, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_input_scalars() {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_value(json!({
            "a": "text",
            "b": 42,
            "c": true,
            "d": null,
        }))
        .unwrap();
        let values = value_input(raw).unwrap();
        assert_eq!(values["a"].as_deref(), Some("text"));
        assert_eq!(values["b"].as_deref(), Some("42"));
        assert_eq!(values["c"].as_deref(), Some("true"));
        assert_eq!(values["d"], None);
    }

    #[test]
    fn test_value_input_rejects_nested() {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_value(json!({"a": ["x"]})).unwrap();
        assert!(matches!(value_input(raw), Err(ApiError::BadRequest { .. })));
    }
}
