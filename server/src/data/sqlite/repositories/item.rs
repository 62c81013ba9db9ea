//! Item repository for SQLite operations
//!
//! Items are ranked within their section through [`SiblingScope::ITEMS`]. Value
//! writes share the item's transaction.

use sqlx::{SqliteConnection, SqlitePool};

use super::item_value;
use crate::data::sqlite::SqliteError;
use crate::data::sqlite::ordering::SiblingScope;
use crate::data::types::{ItemRow, ItemUpdateResult, MoveOutcome, ValueChange, ValueWrite};

type ItemTuple = (String, String, String, i64, i64, i64);

const ITEM_COLUMNS: &str = "id, section_id, title, position, created_at, updated_at";

fn row_to_item(row: ItemTuple) -> ItemRow {
    let (id, section_id, title, position, created_at, updated_at) = row;
    ItemRow {
        id,
        section_id,
        title,
        position,
        created_at,
        updated_at,
    }
}

async fn fetch_item(conn: &mut SqliteConnection, id: &str) -> Result<Option<ItemRow>, SqliteError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?");
    let row = sqlx::query_as::<_, ItemTuple>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(row_to_item))
}

/// Append an item to a section and write its initial values
pub async fn create_item(
    pool: &SqlitePool,
    section_id: &str,
    title: &str,
    values: &[ValueWrite],
) -> Result<(ItemRow, Vec<ValueChange>), SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;
    let scope = SiblingScope::ITEMS;
    scope.lock(&mut tx, section_id).await?;
    let position = scope.next_position(&mut tx, section_id).await?;

    sqlx::query(
        "INSERT INTO items (id, section_id, title, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(section_id)
    .bind(title)
    .bind(position)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let changes = item_value::apply_writes(&mut tx, &id, values).await?;
    tx.commit().await?;

    let item = ItemRow {
        id,
        section_id: section_id.to_string(),
        title: title.to_string(),
        position,
        created_at: now,
        updated_at: now,
    };
    Ok((item, changes))
}

pub async fn get_item(pool: &SqlitePool, id: &str) -> Result<Option<ItemRow>, SqliteError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?");
    let row = sqlx::query_as::<_, ItemTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(row_to_item))
}

/// Items of every section of a board, in section rank then item rank
pub async fn list_for_board(pool: &SqlitePool, board_id: &str) -> Result<Vec<ItemRow>, SqliteError> {
    let rows = sqlx::query_as::<_, ItemTuple>(
        r#"
        SELECT i.id, i.section_id, i.title, i.position, i.created_at, i.updated_at
        FROM items i
        JOIN sections s ON s.id = i.section_id
        WHERE s.board_id = ?
        ORDER BY s.position, i.position
        "#,
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_item).collect())
}

/// Update title and/or values in one transaction
pub async fn update_item(
    pool: &SqlitePool,
    id: &str,
    title: Option<&str>,
    values: &[ValueWrite],
) -> Result<Option<ItemUpdateResult>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    // Write first so the snapshot read below cannot go stale
    sqlx::query("UPDATE items SET position = position WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let Some(before) = fetch_item(&mut tx, id).await? else {
        return Ok(None);
    };

    let mut after = before.clone();
    if let Some(title) = title.filter(|t| *t != before.title) {
        sqlx::query("UPDATE items SET title = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        after.title = title.to_string();
        after.updated_at = now;
    }

    let changes = item_value::apply_writes(&mut tx, id, values).await?;
    tx.commit().await?;

    Ok(Some(ItemUpdateResult {
        before,
        after,
        changes,
    }))
}

/// Delete an item (values and comments cascade) and re-rank its section
pub async fn delete_item(pool: &SqlitePool, id: &str) -> Result<Option<ItemRow>, SqliteError> {
    let mut tx = pool.begin().await?;
    SiblingScope::ITEMS.lock_of(&mut tx, id).await?;
    let Some(row) = fetch_item(&mut tx, id).await? else {
        return Ok(None);
    };
    SiblingScope::ITEMS.remove(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Some(row))
}

/// Move an item to `target` within `section_id`, which may be its current section
pub async fn move_item(
    pool: &SqlitePool,
    id: &str,
    section_id: &str,
    target: i64,
) -> Result<Option<MoveOutcome>, SqliteError> {
    let mut tx = pool.begin().await?;
    let outcome = SiblingScope::ITEMS
        .move_across(&mut tx, id, section_id, target)
        .await?;
    tx.commit().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    async fn titles(pool: &SqlitePool, section_id: &str) -> Vec<(String, i64)> {
        sqlx::query_as("SELECT title, position FROM items WHERE section_id = ? ORDER BY position")
            .bind(section_id)
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_item_with_values() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let column = fixtures::text_column(db.pool(), &board_id, "Notes").await;

        let writes = vec![ValueWrite {
            column_id: column.clone(),
            value: Some("first".to_string()),
        }];
        let (item, changes) = create_item(db.pool(), &section, "Task", &writes)
            .await
            .unwrap();
        assert_eq!(item.position, 0);
        assert_eq!(changes.len(), 1);

        let (second, _) = create_item(db.pool(), &section, "Next", &[]).await.unwrap();
        assert_eq!(second.position, 1);
    }

    #[tokio::test]
    async fn test_update_title_unchanged_keeps_timestamp() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let (item, _) = create_item(db.pool(), &section, "Task", &[]).await.unwrap();

        let result = update_item(db.pool(), &item.id, Some("Task"), &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.before.title, result.after.title);
        assert!(result.changes.is_empty());

        let result = update_item(db.pool(), &item.id, Some("Renamed"), &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.after.title, "Renamed");
        assert!(update_item(db.pool(), "missing", None, &[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_move_within_section_two_to_zero() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let mut ids = Vec::new();
        for title in ["a", "b", "c", "d"] {
            ids.push(create_item(db.pool(), &section, title, &[]).await.unwrap().0.id);
        }

        move_item(db.pool(), &ids[2], &section, 0).await.unwrap().unwrap();
        assert_eq!(
            titles(db.pool(), &section).await,
            vec![
                ("c".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("d".to_string(), 3)
            ]
        );
    }

    #[tokio::test]
    async fn test_move_across_sections() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let left = fixtures::section(db.pool(), &board_id, "L").await;
        let right = fixtures::section(db.pool(), &board_id, "R").await;
        let a = create_item(db.pool(), &left, "a", &[]).await.unwrap().0;
        create_item(db.pool(), &left, "b", &[]).await.unwrap();
        create_item(db.pool(), &right, "x", &[]).await.unwrap();

        let outcome = move_item(db.pool(), &a.id, &right, 0).await.unwrap().unwrap();
        assert_eq!(outcome.old_parent_id, left);
        assert_eq!(outcome.new_parent_id, right);

        assert_eq!(titles(db.pool(), &left).await, vec![("b".to_string(), 0)]);
        assert_eq!(
            titles(db.pool(), &right).await,
            vec![("a".to_string(), 0), ("x".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_delete_item_and_list_for_board() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let first = fixtures::section(db.pool(), &board_id, "1").await;
        let second = fixtures::section(db.pool(), &board_id, "2").await;
        create_item(db.pool(), &second, "z", &[]).await.unwrap();
        let a = create_item(db.pool(), &first, "a", &[]).await.unwrap().0;
        create_item(db.pool(), &first, "b", &[]).await.unwrap();

        let listed: Vec<String> = list_for_board(db.pool(), &board_id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(listed, vec!["a", "b", "z"]);

        delete_item(db.pool(), &a.id).await.unwrap().unwrap();
        assert_eq!(titles(db.pool(), &first).await, vec![("b".to_string(), 0)]);
    }
}
