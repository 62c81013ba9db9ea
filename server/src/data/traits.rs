//! Repository trait for the transactional store
//!
//! Services depend on [`TransactionalRepository`] only; the SQLite backend
//! implements it for `Arc<SqliteService>`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    ActivityRow, BoardAccess, BoardRole, BoardRow, BoardWithRole, ColumnDefinition, ColumnRow,
    ColumnUpdate, CommentRow, ItemRow, ItemUpdateResult, ItemValueMap, MemberUpsert,
    MemberWithUser, MoveOutcome, NewActivity, NewUser, SectionRow, SectionWithCount, UserRow,
    UserUpdate, ValueChange, ValueWrite,
};

/// Repository trait for transactional operations (users, boards, ranked children, audit)
///
/// Rank-changing operations run in a single transaction that takes the parent
/// scope's write lock before reading any rank.
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    // ==================== User Operations ====================

    /// Create a user; duplicate email is `Conflict`
    async fn create_user(&self, user: &NewUser) -> Result<UserRow, DataError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    /// Get a user by case-folded email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError>;

    /// User plus stored password hash
    async fn get_credentials(&self, email: &str) -> Result<Option<(UserRow, String)>, DataError>;

    /// Active users ordered by name
    async fn list_active_users(&self) -> Result<Vec<UserRow>, DataError>;

    async fn update_user(&self, id: &str, update: &UserUpdate)
    -> Result<Option<UserRow>, DataError>;

    /// Mark inactive and rename
    async fn deactivate_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    async fn count_users(&self) -> Result<i64, DataError>;

    // ==================== Board Operations ====================

    /// Create a board with its OWNER membership atomically
    async fn create_board_with_owner(&self, name: &str, owner_id: &str)
    -> Result<BoardRow, DataError>;

    async fn get_board(&self, id: &str) -> Result<Option<BoardRow>, DataError>;

    /// Boards owned by or shared with the user, with the user's role
    async fn list_boards_for_user(&self, user_id: &str) -> Result<Vec<BoardWithRole>, DataError>;

    /// Rename; returns (before, after)
    async fn rename_board(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<(BoardRow, BoardRow)>, DataError>;

    async fn delete_board(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Access & Context ====================

    /// Owner and membership of one user in one query; `None` when the board is missing
    async fn get_board_access(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<BoardAccess>, DataError>;

    async fn board_exists(&self, board_id: &str) -> Result<bool, DataError>;

    async fn get_section_board(&self, section_id: &str) -> Result<Option<String>, DataError>;

    async fn get_column_board(&self, column_id: &str) -> Result<Option<String>, DataError>;

    /// Item -> section -> board
    async fn get_item_board(&self, item_id: &str) -> Result<Option<String>, DataError>;

    // ==================== Membership Operations ====================

    /// Insert or change an EDITOR/VIEWER membership
    async fn upsert_member(
        &self,
        board_id: &str,
        user_id: &str,
        role: BoardRole,
    ) -> Result<MemberUpsert, DataError>;

    /// Owner first, then others by name
    async fn list_members(&self, board_id: &str) -> Result<Vec<MemberWithUser>, DataError>;

    async fn get_member(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<MemberWithUser>, DataError>;

    /// Remove a non-owner membership; returns the removed role
    async fn remove_member(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<BoardRole>, DataError>;

    // ==================== Section Operations ====================

    async fn create_section(&self, board_id: &str, name: &str) -> Result<SectionRow, DataError>;

    async fn get_section(&self, id: &str) -> Result<Option<SectionRow>, DataError>;

    async fn list_sections(&self, board_id: &str) -> Result<Vec<SectionRow>, DataError>;

    async fn list_sections_with_counts(
        &self,
        board_id: &str,
    ) -> Result<Vec<SectionWithCount>, DataError>;

    async fn rename_section(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<(SectionRow, SectionRow)>, DataError>;

    async fn delete_section(&self, id: &str) -> Result<Option<SectionRow>, DataError>;

    async fn move_section(&self, id: &str, target: i64) -> Result<Option<MoveOutcome>, DataError>;

    // ==================== Column Operations ====================

    /// Append a column; duplicate name on the board is `Conflict`
    async fn create_column(
        &self,
        board_id: &str,
        def: &ColumnDefinition,
    ) -> Result<ColumnRow, DataError>;

    async fn get_column(&self, id: &str) -> Result<Option<ColumnRow>, DataError>;

    async fn list_columns(&self, board_id: &str) -> Result<Vec<ColumnRow>, DataError>;

    /// Replace a definition only if the stored one still equals `expected`
    async fn update_column(
        &self,
        id: &str,
        expected: &ColumnDefinition,
        def: &ColumnDefinition,
    ) -> Result<Option<ColumnUpdate>, DataError>;

    async fn delete_column(&self, id: &str) -> Result<Option<ColumnRow>, DataError>;

    async fn move_column(&self, id: &str, target: i64) -> Result<Option<MoveOutcome>, DataError>;

    // ==================== Item Operations ====================

    /// Append an item and write its values in one transaction
    async fn create_item(
        &self,
        section_id: &str,
        title: &str,
        values: &[ValueWrite],
    ) -> Result<(ItemRow, Vec<ValueChange>), DataError>;

    async fn get_item(&self, id: &str) -> Result<Option<ItemRow>, DataError>;

    /// Items of a board in section rank then item rank
    async fn list_items_for_board(&self, board_id: &str) -> Result<Vec<ItemRow>, DataError>;

    async fn update_item(
        &self,
        id: &str,
        title: Option<&str>,
        values: &[ValueWrite],
    ) -> Result<Option<ItemUpdateResult>, DataError>;

    async fn delete_item(&self, id: &str) -> Result<Option<ItemRow>, DataError>;

    /// Move within or across sections
    async fn move_item(
        &self,
        id: &str,
        section_id: &str,
        target: i64,
    ) -> Result<Option<MoveOutcome>, DataError>;

    /// item id -> column name -> value for a whole board
    async fn pivot_item_values(
        &self,
        board_id: &str,
    ) -> Result<HashMap<String, ItemValueMap>, DataError>;

    async fn item_values(&self, item_id: &str) -> Result<ItemValueMap, DataError>;

    // ==================== Comment Operations ====================

    async fn create_comment(
        &self,
        item_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<CommentRow, DataError>;

    async fn get_comment(&self, id: &str) -> Result<Option<CommentRow>, DataError>;

    async fn list_comments(&self, item_id: &str) -> Result<Vec<CommentRow>, DataError>;

    async fn list_comments_for_board(&self, board_id: &str) -> Result<Vec<CommentRow>, DataError>;

    async fn delete_comment(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Activity & Health ====================

    async fn insert_activity(&self, entry: &NewActivity) -> Result<(), DataError>;

    async fn list_activity(&self, board_id: &str, limit: u32)
    -> Result<Vec<ActivityRow>, DataError>;

    /// Cheap round-trip used by the health endpoint
    async fn ping(&self) -> Result<(), DataError>;
}
