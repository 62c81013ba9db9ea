//! String-backed enums shared by storage and services
//!
//! Each enum round-trips through its upper-case storage form via `parse`/`as_str`.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Global account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    #[default]
    Member,
}

impl UserRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "MEMBER" => Some(Self::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user on a single board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoardRole {
    Owner,
    Editor,
    Viewer,
}

impl BoardRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OWNER" => Some(Self::Owner),
            "EDITOR" => Some(Self::Editor),
            "VIEWER" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => crate::core::constants::BOARD_ROLE_OWNER,
            Self::Editor => crate::core::constants::BOARD_ROLE_EDITOR,
            Self::Viewer => crate::core::constants::BOARD_ROLE_VIEWER,
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Owner | Self::Editor)
    }
}

impl fmt::Display for BoardRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data type tag of a custom column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    Text,
    LongText,
    Select,
    User,
    Date,
    Number,
    Formula,
}

impl ColumnType {
    pub const ALL: [ColumnType; 7] = [
        Self::Text,
        Self::LongText,
        Self::Select,
        Self::User,
        Self::Date,
        Self::Number,
        Self::Formula,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::LongText => "LONG_TEXT",
            Self::Select => "SELECT",
            Self::User => "USER",
            Self::Date => "DATE",
            Self::Number => "NUMBER",
            Self::Formula => "FORMULA",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Move,
}

impl ActivityAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "MOVE" => Some(Self::Move),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Move => "MOVE",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of board-scoped entity, used for context resolution and audit records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Board,
    Section,
    Column,
    Item,
    ItemValue,
    Comment,
    Member,
}

impl EntityKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOARD" => Some(Self::Board),
            "SECTION" => Some(Self::Section),
            "COLUMN" => Some(Self::Column),
            "ITEM" => Some(Self::Item),
            "ITEM_VALUE" => Some(Self::ItemValue),
            "COMMENT" => Some(Self::Comment),
            "MEMBER" => Some(Self::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Board => "BOARD",
            Self::Section => "SECTION",
            Self::Column => "COLUMN",
            Self::Item => "ITEM",
            Self::ItemValue => "ITEM_VALUE",
            Self::Comment => "COMMENT",
            Self::Member => "MEMBER",
        }
    }

    /// Display name used in "<Entity> not found" messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Board => "Board",
            Self::Section => "Section",
            Self::Column => "Column",
            Self::Item => "Item",
            Self::ItemValue => "Item value",
            Self::Comment => "Comment",
            Self::Member => "Member",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_parse_all() {
        for t in ColumnType::ALL {
            assert_eq!(ColumnType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ColumnType::parse("select"), None);
        assert_eq!(ColumnType::parse("CHECKBOX"), None);
    }

    #[test]
    fn test_column_type_serde() {
        let json = serde_json::to_string(&ColumnType::LongText).unwrap();
        assert_eq!(json, "\"LONG_TEXT\"");
        let parsed: ColumnType = serde_json::from_str("\"FORMULA\"").unwrap();
        assert_eq!(parsed, ColumnType::Formula);
    }

    #[test]
    fn test_board_role_can_edit() {
        assert!(BoardRole::Owner.can_edit());
        assert!(BoardRole::Editor.can_edit());
        assert!(!BoardRole::Viewer.can_edit());
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!(BoardRole::parse("editor"), Some(BoardRole::Editor));
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(BoardRole::parse("admin"), None);
    }

    #[test]
    fn test_entity_kind_roundtrip_and_label() {
        let kind = EntityKind::parse("SECTION").unwrap();
        assert_eq!(kind.as_str(), "SECTION");
        assert_eq!(kind.label(), "Section");
    }
}
