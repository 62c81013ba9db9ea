//! TransactionalRepository trait implementation for SQLite
//!
//! Implements the trait for `Arc<SqliteService>` by delegating to the per-table
//! repository functions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    ActivityRow, BoardAccess, BoardRole, BoardRow, BoardWithRole, ColumnDefinition, ColumnRow,
    ColumnUpdate, CommentRow, ItemRow, ItemUpdateResult, ItemValueMap, MemberUpsert,
    MemberWithUser, MoveOutcome, NewActivity, NewUser, SectionRow, SectionWithCount, UserRow,
    UserUpdate, ValueChange, ValueWrite,
};

use super::SqliteService;
use super::repositories::{
    activity, board, column, comment, context, item, item_value, membership, section, user,
};

#[async_trait]
impl TransactionalRepository for Arc<SqliteService> {
    // ==================== User Operations ====================

    async fn create_user(&self, new_user: &NewUser) -> Result<UserRow, DataError> {
        user::create_user(self.pool(), new_user)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), id).await.map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError> {
        user::get_by_email(self.pool(), email)
            .await
            .map_err(Into::into)
    }

    async fn get_credentials(&self, email: &str) -> Result<Option<(UserRow, String)>, DataError> {
        user::get_credentials(self.pool(), email)
            .await
            .map_err(Into::into)
    }

    async fn list_active_users(&self) -> Result<Vec<UserRow>, DataError> {
        user::list_active(self.pool()).await.map_err(Into::into)
    }

    async fn update_user(
        &self,
        id: &str,
        update: &UserUpdate,
    ) -> Result<Option<UserRow>, DataError> {
        user::update_user(self.pool(), id, update)
            .await
            .map_err(Into::into)
    }

    async fn deactivate_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::deactivate_user(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn count_users(&self) -> Result<i64, DataError> {
        user::count_users(self.pool()).await.map_err(Into::into)
    }

    // ==================== Board Operations ====================

    async fn create_board_with_owner(
        &self,
        name: &str,
        owner_id: &str,
    ) -> Result<BoardRow, DataError> {
        board::create_board_with_owner(self.pool(), name, owner_id)
            .await
            .map_err(Into::into)
    }

    async fn get_board(&self, id: &str) -> Result<Option<BoardRow>, DataError> {
        board::get_board(self.pool(), id).await.map_err(Into::into)
    }

    async fn list_boards_for_user(&self, user_id: &str) -> Result<Vec<BoardWithRole>, DataError> {
        board::list_for_user(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn rename_board(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<(BoardRow, BoardRow)>, DataError> {
        board::rename_board(self.pool(), id, name)
            .await
            .map_err(Into::into)
    }

    async fn delete_board(&self, id: &str) -> Result<bool, DataError> {
        board::delete_board(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Access & Context ====================

    async fn get_board_access(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<BoardAccess>, DataError> {
        board::get_access(self.pool(), board_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn board_exists(&self, board_id: &str) -> Result<bool, DataError> {
        context::board_exists(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn get_section_board(&self, section_id: &str) -> Result<Option<String>, DataError> {
        context::section_board(self.pool(), section_id)
            .await
            .map_err(Into::into)
    }

    async fn get_column_board(&self, column_id: &str) -> Result<Option<String>, DataError> {
        context::column_board(self.pool(), column_id)
            .await
            .map_err(Into::into)
    }

    async fn get_item_board(&self, item_id: &str) -> Result<Option<String>, DataError> {
        context::item_board(self.pool(), item_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Membership Operations ====================

    async fn upsert_member(
        &self,
        board_id: &str,
        user_id: &str,
        role: BoardRole,
    ) -> Result<MemberUpsert, DataError> {
        membership::upsert_member(self.pool(), board_id, user_id, role)
            .await
            .map_err(Into::into)
    }

    async fn list_members(&self, board_id: &str) -> Result<Vec<MemberWithUser>, DataError> {
        membership::list_members(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn get_member(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<MemberWithUser>, DataError> {
        membership::get_member_with_user(self.pool(), board_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn remove_member(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<BoardRole>, DataError> {
        membership::remove_member(self.pool(), board_id, user_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Section Operations ====================

    async fn create_section(&self, board_id: &str, name: &str) -> Result<SectionRow, DataError> {
        section::create_section(self.pool(), board_id, name)
            .await
            .map_err(Into::into)
    }

    async fn get_section(&self, id: &str) -> Result<Option<SectionRow>, DataError> {
        section::get_section(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_sections(&self, board_id: &str) -> Result<Vec<SectionRow>, DataError> {
        section::list_sections(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn list_sections_with_counts(
        &self,
        board_id: &str,
    ) -> Result<Vec<SectionWithCount>, DataError> {
        section::list_with_counts(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn rename_section(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<(SectionRow, SectionRow)>, DataError> {
        section::rename_section(self.pool(), id, name)
            .await
            .map_err(Into::into)
    }

    async fn delete_section(&self, id: &str) -> Result<Option<SectionRow>, DataError> {
        section::delete_section(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn move_section(&self, id: &str, target: i64) -> Result<Option<MoveOutcome>, DataError> {
        section::move_section(self.pool(), id, target)
            .await
            .map_err(Into::into)
    }

    // ==================== Column Operations ====================

    async fn create_column(
        &self,
        board_id: &str,
        def: &ColumnDefinition,
    ) -> Result<ColumnRow, DataError> {
        column::create_column(self.pool(), board_id, def)
            .await
            .map_err(Into::into)
    }

    async fn get_column(&self, id: &str) -> Result<Option<ColumnRow>, DataError> {
        column::get_column(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_columns(&self, board_id: &str) -> Result<Vec<ColumnRow>, DataError> {
        column::list_columns(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn update_column(
        &self,
        id: &str,
        expected: &ColumnDefinition,
        def: &ColumnDefinition,
    ) -> Result<Option<ColumnUpdate>, DataError> {
        column::update_column(self.pool(), id, expected, def)
            .await
            .map_err(Into::into)
    }

    async fn delete_column(&self, id: &str) -> Result<Option<ColumnRow>, DataError> {
        column::delete_column(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn move_column(&self, id: &str, target: i64) -> Result<Option<MoveOutcome>, DataError> {
        column::move_column(self.pool(), id, target)
            .await
            .map_err(Into::into)
    }

    // ==================== Item Operations ====================

    async fn create_item(
        &self,
        section_id: &str,
        title: &str,
        values: &[ValueWrite],
    ) -> Result<(ItemRow, Vec<ValueChange>), DataError> {
        item::create_item(self.pool(), section_id, title, values)
            .await
            .map_err(Into::into)
    }

    async fn get_item(&self, id: &str) -> Result<Option<ItemRow>, DataError> {
        item::get_item(self.pool(), id).await.map_err(Into::into)
    }

    async fn list_items_for_board(&self, board_id: &str) -> Result<Vec<ItemRow>, DataError> {
        item::list_for_board(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn update_item(
        &self,
        id: &str,
        title: Option<&str>,
        values: &[ValueWrite],
    ) -> Result<Option<ItemUpdateResult>, DataError> {
        item::update_item(self.pool(), id, title, values)
            .await
            .map_err(Into::into)
    }

    async fn delete_item(&self, id: &str) -> Result<Option<ItemRow>, DataError> {
        item::delete_item(self.pool(), id).await.map_err(Into::into)
    }

    async fn move_item(
        &self,
        id: &str,
        section_id: &str,
        target: i64,
    ) -> Result<Option<MoveOutcome>, DataError> {
        item::move_item(self.pool(), id, section_id, target)
            .await
            .map_err(Into::into)
    }

    async fn pivot_item_values(
        &self,
        board_id: &str,
    ) -> Result<HashMap<String, ItemValueMap>, DataError> {
        item_value::pivot_for_board(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn item_values(&self, item_id: &str) -> Result<ItemValueMap, DataError> {
        item_value::values_for_item(self.pool(), item_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Comment Operations ====================

    async fn create_comment(
        &self,
        item_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<CommentRow, DataError> {
        comment::create_comment(self.pool(), item_id, author_id, content)
            .await
            .map_err(Into::into)
    }

    async fn get_comment(&self, id: &str) -> Result<Option<CommentRow>, DataError> {
        comment::get_comment(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_comments(&self, item_id: &str) -> Result<Vec<CommentRow>, DataError> {
        comment::list_for_item(self.pool(), item_id)
            .await
            .map_err(Into::into)
    }

    async fn list_comments_for_board(&self, board_id: &str) -> Result<Vec<CommentRow>, DataError> {
        comment::list_for_board(self.pool(), board_id)
            .await
            .map_err(Into::into)
    }

    async fn delete_comment(&self, id: &str) -> Result<bool, DataError> {
        comment::delete_comment(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Activity & Health ====================

    async fn insert_activity(&self, entry: &NewActivity) -> Result<(), DataError> {
        activity::insert_activity(self.pool(), entry)
            .await
            .map_err(Into::into)
    }

    async fn list_activity(
        &self,
        board_id: &str,
        limit: u32,
    ) -> Result<Vec<ActivityRow>, DataError> {
        activity::list_for_board(self.pool(), board_id, limit)
            .await
            .map_err(Into::into)
    }

    async fn ping(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(DataError::Sqlite)
    }
}
