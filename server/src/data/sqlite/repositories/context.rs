//! Child entity -> owning board lookups

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;

pub async fn board_exists(pool: &SqlitePool, board_id: &str) -> Result<bool, SqliteError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM boards WHERE id = ?)")
        .bind(board_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn section_board(pool: &SqlitePool, section_id: &str) -> Result<Option<String>, SqliteError> {
    let board_id = sqlx::query_scalar("SELECT board_id FROM sections WHERE id = ?")
        .bind(section_id)
        .fetch_optional(pool)
        .await?;
    Ok(board_id)
}

pub async fn column_board(pool: &SqlitePool, column_id: &str) -> Result<Option<String>, SqliteError> {
    let board_id = sqlx::query_scalar("SELECT board_id FROM board_columns WHERE id = ?")
        .bind(column_id)
        .fetch_optional(pool)
        .await?;
    Ok(board_id)
}

/// Item -> section -> board
pub async fn item_board(pool: &SqlitePool, item_id: &str) -> Result<Option<String>, SqliteError> {
    let board_id = sqlx::query_scalar(
        "SELECT s.board_id FROM items i JOIN sections s ON s.id = i.section_id WHERE i.id = ?",
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?;
    Ok(board_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    #[tokio::test]
    async fn test_resolves_through_chain() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let column = fixtures::text_column(db.pool(), &board_id, "C").await;
        let item = fixtures::item(db.pool(), &section, "i").await;

        assert!(board_exists(db.pool(), &board_id).await.unwrap());
        assert!(!board_exists(db.pool(), "nope").await.unwrap());
        assert_eq!(section_board(db.pool(), &section).await.unwrap(), Some(board_id.clone()));
        assert_eq!(column_board(db.pool(), &column).await.unwrap(), Some(board_id.clone()));
        assert_eq!(item_board(db.pool(), &item).await.unwrap(), Some(board_id));
        assert_eq!(item_board(db.pool(), "nope").await.unwrap(), None);
    }
}
