//! Board repository for SQLite operations
//!
//! `boards.owner_id` is authoritative; the OWNER membership row is written in the
//! same transaction as the board and removed with it by cascade.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{BoardAccess, BoardRole, BoardRow, BoardWithRole};

/// Create a board and its OWNER membership atomically
pub async fn create_board_with_owner(
    pool: &SqlitePool,
    name: &str,
    owner_id: &str,
) -> Result<BoardRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO boards (id, name, owner_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO board_members (board_id, user_id, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(BoardRole::Owner.as_str())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(BoardRow {
        id,
        name: name.to_string(),
        owner_id: owner_id.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_board(pool: &SqlitePool, id: &str) -> Result<Option<BoardRow>, SqliteError> {
    let row = sqlx::query_as::<_, (String, String, String, i64, i64)>(
        "SELECT id, name, owner_id, created_at, updated_at FROM boards WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, owner_id, created_at, updated_at)| BoardRow {
        id,
        name,
        owner_id,
        created_at,
        updated_at,
    }))
}

/// Boards the user owns or is a member of, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<BoardWithRole>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, String, i64, i64, String)>(
        r#"
        SELECT b.id, b.name, b.owner_id, b.created_at, b.updated_at,
               CASE WHEN b.owner_id = ?1 THEN 'OWNER' ELSE m.role END AS role
        FROM boards b
        LEFT JOIN board_members m ON m.board_id = b.id AND m.user_id = ?1
        WHERE b.owner_id = ?1 OR m.user_id IS NOT NULL
        ORDER BY b.created_at DESC, b.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(id, name, owner_id, created_at, updated_at, role)| {
            let role = BoardRole::parse(&role)
                .ok_or_else(|| SqliteError::decode("board_members.role", &role))?;
            Ok(BoardWithRole {
                board: BoardRow {
                    id,
                    name,
                    owner_id,
                    created_at,
                    updated_at,
                },
                role,
            })
        })
        .collect()
}

/// Owner plus the user's membership role in one query; `None` when the board is missing
pub async fn get_access(
    pool: &SqlitePool,
    board_id: &str,
    user_id: &str,
) -> Result<Option<BoardAccess>, SqliteError> {
    let row = sqlx::query_as::<_, (String, Option<String>)>(
        r#"
        SELECT b.owner_id, m.role
        FROM boards b
        LEFT JOIN board_members m ON m.board_id = b.id AND m.user_id = ?
        WHERE b.id = ?
        "#,
    )
    .bind(user_id)
    .bind(board_id)
    .fetch_optional(pool)
    .await?;

    row.map(|(owner_id, role)| {
        let member_role = role
            .map(|r| BoardRole::parse(&r).ok_or_else(|| SqliteError::decode("board_members.role", &r)))
            .transpose()?;
        Ok(BoardAccess {
            owner_id,
            member_role,
        })
    })
    .transpose()
}

/// Rename a board. Returns the previous row, `None` when missing.
pub async fn rename_board(
    pool: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<(BoardRow, BoardRow)>, SqliteError> {
    let Some(before) = get_board(pool, id).await? else {
        return Ok(None);
    };
    if before.name == name {
        return Ok(Some((before.clone(), before)));
    }

    let now = chrono::Utc::now().timestamp();
    sqlx::query("UPDATE boards SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    let after = BoardRow {
        name: name.to_string(),
        updated_at: now,
        ..before.clone()
    };
    Ok(Some((before, after)))
}

/// Delete a board; sections, items, columns, members and logs cascade
pub async fn delete_board(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM boards WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    #[tokio::test]
    async fn test_create_board_makes_owner_member() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Owner").await;

        let board = create_board_with_owner(db.pool(), "Roadmap", &owner)
            .await
            .unwrap();

        let boards = list_for_user(db.pool(), &owner).await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].board.id, board.id);
        assert_eq!(boards[0].role, BoardRole::Owner);

        let access = get_access(db.pool(), &board.id, &owner).await.unwrap().unwrap();
        assert_eq!(access.owner_id, owner);
        assert_eq!(access.member_role, Some(BoardRole::Owner));
    }

    #[tokio::test]
    async fn test_access_for_stranger_and_missing_board() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Owner").await;
        let stranger = fixtures::user(db.pool(), "Stranger").await;
        let board = create_board_with_owner(db.pool(), "Roadmap", &owner)
            .await
            .unwrap();

        let access = get_access(db.pool(), &board.id, &stranger)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(access.member_role, None);
        assert!(get_access(db.pool(), "missing", &owner).await.unwrap().is_none());
        assert!(list_for_user(db.pool(), &stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_reports_before_and_after() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Owner").await;
        let board = create_board_with_owner(db.pool(), "Old", &owner).await.unwrap();

        let (before, after) = rename_board(db.pool(), &board.id, "New")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.name, "Old");
        assert_eq!(after.name, "New");
        assert_eq!(get_board(db.pool(), &board.id).await.unwrap().unwrap().name, "New");
    }

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Owner").await;
        let board = create_board_with_owner(db.pool(), "Doomed", &owner)
            .await
            .unwrap();

        assert!(delete_board(db.pool(), &board.id).await.unwrap());
        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM board_members")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(members, 0);
        assert!(!delete_board(db.pool(), &board.id).await.unwrap());
    }
}
