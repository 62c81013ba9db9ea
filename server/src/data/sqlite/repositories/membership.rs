//! Board membership repository for SQLite operations
//!
//! The OWNER row is managed by the board repository. Upsert and remove here only
//! ever touch EDITOR/VIEWER rows.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{BoardRole, MemberUpsert, MemberWithUser, MembershipRow};

fn parse_role(role: &str) -> Result<BoardRole, SqliteError> {
    BoardRole::parse(role).ok_or_else(|| SqliteError::decode("board_members.role", role))
}

/// Add a member or change their role
///
/// Runs in one transaction so the previous role reported back is the one replaced.
pub async fn upsert_member(
    pool: &SqlitePool,
    board_id: &str,
    user_id: &str,
    role: BoardRole,
) -> Result<MemberUpsert, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    // Write first so the transaction holds the write lock before reading
    sqlx::query("UPDATE board_members SET role = role WHERE board_id = ? AND user_id = ?")
        .bind(board_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let existing = sqlx::query_as::<_, (String, i64)>(
        "SELECT role, created_at FROM board_members WHERE board_id = ? AND user_id = ?",
    )
    .bind(board_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match existing {
        None => {
            sqlx::query(
                "INSERT INTO board_members (board_id, user_id, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(board_id)
            .bind(user_id)
            .bind(role.as_str())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            MemberUpsert::Created(MembershipRow {
                board_id: board_id.to_string(),
                user_id: user_id.to_string(),
                role,
                created_at: now,
                updated_at: now,
            })
        }
        Some((previous, created_at)) => {
            let previous = parse_role(&previous)?;
            if previous == role {
                MemberUpsert::Unchanged(MembershipRow {
                    board_id: board_id.to_string(),
                    user_id: user_id.to_string(),
                    role,
                    created_at,
                    updated_at: created_at,
                })
            } else {
                sqlx::query(
                    "UPDATE board_members SET role = ?, updated_at = ? WHERE board_id = ? AND user_id = ?",
                )
                .bind(role.as_str())
                .bind(now)
                .bind(board_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                MemberUpsert::Updated {
                    previous,
                    row: MembershipRow {
                        board_id: board_id.to_string(),
                        user_id: user_id.to_string(),
                        role,
                        created_at,
                        updated_at: now,
                    },
                }
            }
        }
    };

    tx.commit().await?;
    Ok(outcome)
}

/// Get a member with user info
pub async fn get_member_with_user(
    pool: &SqlitePool,
    board_id: &str,
    user_id: &str,
) -> Result<Option<MemberWithUser>, SqliteError> {
    let row = sqlx::query_as::<_, (String, String, String, String, i64)>(
        r#"
        SELECT u.id, u.name, u.email, m.role, m.created_at
        FROM board_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.board_id = ? AND m.user_id = ?
        "#,
    )
    .bind(board_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|(user_id, name, email, role, joined_at)| {
        Ok(MemberWithUser {
            user_id,
            name,
            email,
            role: parse_role(&role)?,
            joined_at,
        })
    })
    .transpose()
}

/// Members of a board: owner first, then by name
pub async fn list_members(
    pool: &SqlitePool,
    board_id: &str,
) -> Result<Vec<MemberWithUser>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, String, String, i64)>(
        r#"
        SELECT u.id, u.name, u.email, m.role, m.created_at
        FROM board_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.board_id = ?
        ORDER BY CASE WHEN m.role = 'OWNER' THEN 0 ELSE 1 END, u.name, u.email
        "#,
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(user_id, name, email, role, joined_at)| {
            Ok(MemberWithUser {
                user_id,
                name,
                email,
                role: parse_role(&role)?,
                joined_at,
            })
        })
        .collect()
}

/// Remove a non-owner member. Returns the removed role, `None` if absent.
pub async fn remove_member(
    pool: &SqlitePool,
    board_id: &str,
    user_id: &str,
) -> Result<Option<BoardRole>, SqliteError> {
    let removed = sqlx::query_scalar::<_, String>(
        "DELETE FROM board_members WHERE board_id = ? AND user_id = ? AND role != 'OWNER' RETURNING role",
    )
    .bind(board_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    removed.map(|r| parse_role(&r)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::{board, fixtures};

    #[tokio::test]
    async fn test_upsert_create_update_unchanged() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Owner").await;
        let member = fixtures::user(db.pool(), "Member").await;
        let b = board::create_board_with_owner(db.pool(), "B", &owner)
            .await
            .unwrap();

        let created = upsert_member(db.pool(), &b.id, &member, BoardRole::Viewer)
            .await
            .unwrap();
        assert!(matches!(created, MemberUpsert::Created(ref r) if r.role == BoardRole::Viewer));

        let updated = upsert_member(db.pool(), &b.id, &member, BoardRole::Editor)
            .await
            .unwrap();
        assert!(matches!(
            updated,
            MemberUpsert::Updated {
                previous: BoardRole::Viewer,
                ..
            }
        ));

        let same = upsert_member(db.pool(), &b.id, &member, BoardRole::Editor)
            .await
            .unwrap();
        assert!(matches!(same, MemberUpsert::Unchanged(_)));
    }

    #[tokio::test]
    async fn test_list_members_owner_first() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Zed").await;
        let alice = fixtures::user(db.pool(), "Alice").await;
        let bob = fixtures::user(db.pool(), "Bob").await;
        let b = board::create_board_with_owner(db.pool(), "B", &owner)
            .await
            .unwrap();
        upsert_member(db.pool(), &b.id, &bob, BoardRole::Viewer)
            .await
            .unwrap();
        upsert_member(db.pool(), &b.id, &alice, BoardRole::Editor)
            .await
            .unwrap();

        let names: Vec<String> = list_members(db.pool(), &b.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Zed", "Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_remove_member_never_removes_owner() {
        let db = SqliteService::in_memory().await;
        let owner = fixtures::user(db.pool(), "Owner").await;
        let member = fixtures::user(db.pool(), "Member").await;
        let b = board::create_board_with_owner(db.pool(), "B", &owner)
            .await
            .unwrap();
        upsert_member(db.pool(), &b.id, &member, BoardRole::Editor)
            .await
            .unwrap();

        assert_eq!(
            remove_member(db.pool(), &b.id, &owner).await.unwrap(),
            None
        );
        assert_eq!(
            remove_member(db.pool(), &b.id, &member).await.unwrap(),
            Some(BoardRole::Editor)
        );
        assert!(
            get_member_with_user(db.pool(), &b.id, &member)
                .await
                .unwrap()
                .is_none()
        );
    }
}
