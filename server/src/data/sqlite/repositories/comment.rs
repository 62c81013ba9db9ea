//! Comment repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::CommentRow;

type CommentTuple = (String, String, String, String, String, i64);

fn row_to_comment(row: CommentTuple) -> CommentRow {
    let (id, item_id, author_id, author_name, content, created_at) = row;
    CommentRow {
        id,
        item_id,
        author_id,
        author_name,
        content,
        created_at,
    }
}

pub async fn create_comment(
    pool: &SqlitePool,
    item_id: &str,
    author_id: &str,
    content: &str,
) -> Result<CommentRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query("INSERT INTO comments (id, item_id, author_id, content, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(item_id)
        .bind(author_id)
        .bind(content)
        .bind(now)
        .execute(pool)
        .await?;

    let author_name: String = sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(CommentRow {
        id,
        item_id: item_id.to_string(),
        author_id: author_id.to_string(),
        author_name,
        content: content.to_string(),
        created_at: now,
    })
}

pub async fn get_comment(pool: &SqlitePool, id: &str) -> Result<Option<CommentRow>, SqliteError> {
    let row = sqlx::query_as::<_, CommentTuple>(
        r#"
        SELECT c.id, c.item_id, c.author_id, u.name, c.content, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(row_to_comment))
}

/// Comments on an item, oldest first
pub async fn list_for_item(pool: &SqlitePool, item_id: &str) -> Result<Vec<CommentRow>, SqliteError> {
    let rows = sqlx::query_as::<_, CommentTuple>(
        r#"
        SELECT c.id, c.item_id, c.author_id, u.name, c.content, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.item_id = ?
        ORDER BY c.created_at, c.rowid
        "#,
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_comment).collect())
}

/// Comments on every item of a board, oldest first
pub async fn list_for_board(pool: &SqlitePool, board_id: &str) -> Result<Vec<CommentRow>, SqliteError> {
    let rows = sqlx::query_as::<_, CommentTuple>(
        r#"
        SELECT c.id, c.item_id, c.author_id, u.name, c.content, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        JOIN items i ON i.id = c.item_id
        JOIN sections s ON s.id = i.section_id
        WHERE s.board_id = ?
        ORDER BY c.created_at, c.rowid
        "#,
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_comment).collect())
}

pub async fn delete_comment(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
