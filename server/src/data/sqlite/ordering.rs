//! Rank maintenance for ordered sibling tables
//!
//! Every function runs on a connection that is already inside a transaction. Callers
//! take the scope's write lock first ([`SiblingScope::lock`] or
//! [`SiblingScope::lock_of`]) so that no rank is read under a stale snapshot.

use sqlx::SqliteConnection;

use super::SqliteError;
use crate::data::ordering::{RankShift, clamp_across, clamp_within, plan_move_within};
use crate::data::types::MoveOutcome;

/// A table of ranked rows grouped by a parent column
#[derive(Debug, Clone, Copy)]
pub struct SiblingScope {
    pub table: &'static str,
    pub parent_column: &'static str,
}

impl SiblingScope {
    pub const SECTIONS: Self = Self {
        table: "sections",
        parent_column: "board_id",
    };
    pub const COLUMNS: Self = Self {
        table: "board_columns",
        parent_column: "board_id",
    };
    pub const ITEMS: Self = Self {
        table: "items",
        parent_column: "section_id",
    };

    /// Take the write lock for `parent_id` with a no-op write
    pub async fn lock(&self, conn: &mut SqliteConnection, parent_id: &str) -> Result<(), SqliteError> {
        let sql = format!(
            "UPDATE {t} SET position = position WHERE {p} = ?",
            t = self.table,
            p = self.parent_column
        );
        sqlx::query(&sql).bind(parent_id).execute(&mut *conn).await?;
        Ok(())
    }

    /// Take the write lock for the parent currently holding `id`
    pub async fn lock_of(&self, conn: &mut SqliteConnection, id: &str) -> Result<(), SqliteError> {
        let sql = format!(
            "UPDATE {t} SET position = position WHERE {p} = (SELECT {p} FROM {t} WHERE id = ?)",
            t = self.table,
            p = self.parent_column
        );
        sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(())
    }

    /// Rank for a new member appended to `parent_id`
    pub async fn next_position(
        &self,
        conn: &mut SqliteConnection,
        parent_id: &str,
    ) -> Result<i64, SqliteError> {
        let sql = format!(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM {t} WHERE {p} = ?",
            t = self.table,
            p = self.parent_column
        );
        let next: i64 = sqlx::query_scalar(&sql)
            .bind(parent_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(next)
    }

    pub async fn count(&self, conn: &mut SqliteConnection, parent_id: &str) -> Result<i64, SqliteError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {t} WHERE {p} = ?",
            t = self.table,
            p = self.parent_column
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(parent_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Parent and rank of a member
    pub async fn locate(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<(String, i64)>, SqliteError> {
        let sql = format!(
            "SELECT {p}, position FROM {t} WHERE id = ?",
            t = self.table,
            p = self.parent_column
        );
        let row: Option<(String, i64)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    pub async fn shift(
        &self,
        conn: &mut SqliteConnection,
        parent_id: &str,
        shift: RankShift,
    ) -> Result<u64, SqliteError> {
        let sql = format!(
            "UPDATE {t} SET position = position + ? WHERE {p} = ? AND position >= ? AND (? IS NULL OR position <= ?)",
            t = self.table,
            p = self.parent_column
        );
        let result = sqlx::query(&sql)
            .bind(shift.delta)
            .bind(parent_id)
            .bind(shift.lo)
            .bind(shift.hi)
            .bind(shift.hi)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a member and close the gap it leaves
    ///
    /// Returns the removed member's parent and rank, `None` when it did not exist.
    pub async fn remove(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<(String, i64)>, SqliteError> {
        self.lock_of(conn, id).await?;
        let sql = format!(
            "DELETE FROM {t} WHERE id = ? RETURNING {p}, position",
            t = self.table,
            p = self.parent_column
        );
        let removed: Option<(String, i64)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        if let Some((parent_id, position)) = &removed {
            self.shift(conn, parent_id, RankShift::close_gap(*position))
                .await?;
        }
        Ok(removed)
    }

    /// Move a member to `target` inside its current parent
    ///
    /// The target is clamped to the sibling range. An unchanged rank performs no writes
    /// beyond the lock.
    pub async fn move_within(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        target: i64,
    ) -> Result<Option<MoveOutcome>, SqliteError> {
        self.lock_of(conn, id).await?;
        let Some((parent_id, old)) = self.locate(conn, id).await? else {
            return Ok(None);
        };
        let count = self.count(conn, &parent_id).await?;
        let new = clamp_within(target, count);

        if let Some(shift) = plan_move_within(old, new) {
            self.shift(conn, &parent_id, shift).await?;
            self.set_position(conn, id, &parent_id, new).await?;
        }

        Ok(Some(MoveOutcome {
            id: id.to_string(),
            old_parent_id: parent_id.clone(),
            new_parent_id: parent_id,
            old_position: old,
            new_position: new,
        }))
    }

    /// Move a member to `target` under `new_parent_id`
    ///
    /// Falls back to [`Self::move_within`] when the parent does not change.
    pub async fn move_across(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        new_parent_id: &str,
        target: i64,
    ) -> Result<Option<MoveOutcome>, SqliteError> {
        self.lock_of(conn, id).await?;
        let Some((old_parent_id, old)) = self.locate(conn, id).await? else {
            return Ok(None);
        };
        if old_parent_id == new_parent_id {
            return self.move_within(conn, id, target).await;
        }

        self.lock(conn, new_parent_id).await?;
        let count_new = self.count(conn, new_parent_id).await?;
        let new = clamp_across(target, count_new);

        self.shift(conn, &old_parent_id, RankShift::close_gap(old))
            .await?;
        self.shift(conn, new_parent_id, RankShift::open_gap(new))
            .await?;
        self.set_position(conn, id, new_parent_id, new).await?;

        Ok(Some(MoveOutcome {
            id: id.to_string(),
            old_parent_id,
            new_parent_id: new_parent_id.to_string(),
            old_position: old,
            new_position: new,
        }))
    }

    async fn set_position(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        parent_id: &str,
        position: i64,
    ) -> Result<(), SqliteError> {
        let sql = format!(
            "UPDATE {t} SET {p} = ?, position = ?, updated_at = ? WHERE id = ?",
            t = self.table,
            p = self.parent_column
        );
        sqlx::query(&sql)
            .bind(parent_id)
            .bind(position)
            .bind(chrono::Utc::now().timestamp())
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
