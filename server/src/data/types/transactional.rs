//! Row types for the transactional store

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::{ActivityAction, BoardRole, ColumnType, EntityKind, UserRole};

// ============================================================================
// User types
// ============================================================================

/// User row from database (credential excluded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Partial user update (None = unchanged)
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub password_hash: Option<String>,
}

// ============================================================================
// Board types
// ============================================================================

/// Board row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRow {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Board with the requesting user's role (for list_boards_for_user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardWithRole {
    pub board: BoardRow,
    pub role: BoardRole,
}

/// Ownership and explicit membership of one user on one board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAccess {
    pub owner_id: String,
    pub member_role: Option<BoardRole>,
}

// ============================================================================
// Membership types
// ============================================================================

/// Membership row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipRow {
    pub board_id: String,
    pub user_id: String,
    pub role: BoardRole,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Member with user info (for list_members)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberWithUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: BoardRole,
    pub joined_at: i64,
}

/// Outcome of a membership upsert
#[derive(Debug, Clone)]
pub enum MemberUpsert {
    Created(MembershipRow),
    Updated {
        previous: BoardRole,
        row: MembershipRow,
    },
    Unchanged(MembershipRow),
}

// ============================================================================
// Section / Column / Item types
// ============================================================================

/// Section row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRow {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Section with its live item count
#[derive(Debug, Clone)]
pub struct SectionWithCount {
    pub section: SectionRow,
    pub item_count: i64,
}

/// Column row from database (options decoded from JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRow {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub data_type: ColumnType,
    pub position: i64,
    pub options: Vec<String>,
    pub formula_expression: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Validated column definition to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: ColumnType,
    pub options: Vec<String>,
    pub formula_expression: Option<String>,
}

impl ColumnRow {
    /// Stored definition, without identity or rank
    pub fn definition(&self) -> ColumnDefinition {
        ColumnDefinition {
            name: self.name.clone(),
            data_type: self.data_type,
            options: self.options.clone(),
            formula_expression: self.formula_expression.clone(),
        }
    }
}

/// Outcome of a compare-and-swap column update
#[derive(Debug, Clone)]
pub enum ColumnUpdate {
    /// Definition replaced; `pruned` values no longer fit it
    Applied {
        before: ColumnRow,
        after: ColumnRow,
        pruned: u64,
    },
    /// Stored definition no longer matches the expected one
    Stale(ColumnRow),
}

/// Item row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: String,
    pub section_id: String,
    pub title: String,
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A requested write to one custom value; `None` clears it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueWrite {
    pub column_id: String,
    pub value: Option<String>,
}

/// A custom value that actually changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub column_id: String,
    pub column_name: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Result of an item update transaction
#[derive(Debug, Clone)]
pub struct ItemUpdateResult {
    pub before: ItemRow,
    pub after: ItemRow,
    pub changes: Vec<ValueChange>,
}

/// Column name -> value for one item
pub type ItemValueMap = BTreeMap<String, String>;

/// Result of a rank move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub id: String,
    pub old_parent_id: String,
    pub new_parent_id: String,
    pub old_position: i64,
    pub new_position: i64,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        self.old_parent_id != self.new_parent_id || self.old_position != self.new_position
    }
}

// ============================================================================
// Comment types
// ============================================================================

/// Comment row with author name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: String,
    pub item_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: i64,
}

// ============================================================================
// Activity types
// ============================================================================

/// Activity entry to append
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub board_id: String,
    pub actor_id: String,
    pub action: ActivityAction,
    pub entity_type: EntityKind,
    pub entity_id: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Activity row with actor details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: String,
    pub board_id: String,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_email: String,
    pub action: ActivityAction,
    pub entity_type: EntityKind,
    pub entity_id: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_outcome_moved() {
        let mut outcome = MoveOutcome {
            id: "i".into(),
            old_parent_id: "s1".into(),
            new_parent_id: "s1".into(),
            old_position: 2,
            new_position: 2,
        };
        assert!(!outcome.moved());
        outcome.new_position = 0;
        assert!(outcome.moved());
        outcome.new_position = 2;
        outcome.new_parent_id = "s2".into();
        assert!(outcome.moved());
    }
}
