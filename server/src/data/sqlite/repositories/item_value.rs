//! Sparse custom-field values for SQLite operations
//!
//! A missing row means "unset"; empty strings are never stored.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{ItemValueMap, ValueChange, ValueWrite};

/// Apply value writes for one item inside the caller's transaction
///
/// `None` deletes an existing value; `Some` inserts or updates. Only writes that
/// actually change the stored value are reported.
pub async fn apply_writes(
    conn: &mut SqliteConnection,
    item_id: &str,
    writes: &[ValueWrite],
) -> Result<Vec<ValueChange>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut changes = Vec::new();

    for write in writes {
        let column_name: String = sqlx::query_scalar("SELECT name FROM board_columns WHERE id = ?")
            .bind(&write.column_id)
            .fetch_one(&mut *conn)
            .await?;
        let old: Option<String> = sqlx::query_scalar(
            "SELECT value FROM item_values WHERE item_id = ? AND column_id = ?",
        )
        .bind(item_id)
        .bind(&write.column_id)
        .fetch_optional(&mut *conn)
        .await?;

        if old == write.value {
            continue;
        }

        match &write.value {
            Some(value) => {
                sqlx::query(
                    r#"
                    INSERT INTO item_values (item_id, column_id, value, updated_at)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT(item_id, column_id) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at
                    "#,
                )
                .bind(item_id)
                .bind(&write.column_id)
                .bind(value)
                .bind(now)
                .execute(&mut *conn)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM item_values WHERE item_id = ? AND column_id = ?")
                    .bind(item_id)
                    .bind(&write.column_id)
                    .execute(&mut *conn)
                    .await?;
            }
        }

        changes.push(ValueChange {
            column_id: write.column_id.clone(),
            column_name,
            old,
            new: write.value.clone(),
        });
    }

    Ok(changes)
}

/// Column name -> value for every item of a board that has values
///
/// One aggregate query; items without values are absent from the map.
pub async fn pivot_for_board(
    pool: &SqlitePool,
    board_id: &str,
) -> Result<HashMap<String, ItemValueMap>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT v.item_id, c.name, v.value
        FROM item_values v
        JOIN items i ON i.id = v.item_id
        JOIN sections s ON s.id = i.section_id
        JOIN board_columns c ON c.id = v.column_id AND c.board_id = s.board_id
        WHERE s.board_id = ?
        "#,
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;

    let mut pivot: HashMap<String, ItemValueMap> = HashMap::new();
    for (item_id, column_name, value) in rows {
        pivot.entry(item_id).or_default().insert(column_name, value);
    }
    Ok(pivot)
}

/// Column name -> value for one item
pub async fn values_for_item(
    pool: &SqlitePool,
    item_id: &str,
) -> Result<ItemValueMap, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT c.name, v.value
        FROM item_values v
        JOIN board_columns c ON c.id = v.column_id
        WHERE v.item_id = ?
        "#,
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    fn write(column_id: &str, value: Option<&str>) -> ValueWrite {
        ValueWrite {
            column_id: column_id.to_string(),
            value: value.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_apply_writes_reports_only_changes() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let column = fixtures::text_column(db.pool(), &board_id, "Notes").await;
        let item = fixtures::item(db.pool(), &section, "a").await;

        let mut conn = db.pool().acquire().await.unwrap();
        let changes = apply_writes(&mut conn, &item, &[write(&column, Some("hi"))])
            .await
            .unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].column_name, "Notes");
        assert_eq!(changes[0].old, None);

        let again = apply_writes(&mut conn, &item, &[write(&column, Some("hi"))])
            .await
            .unwrap();
        assert!(again.is_empty());

        let cleared = apply_writes(&mut conn, &item, &[write(&column, None)])
            .await
            .unwrap();
        assert_eq!(cleared[0].old.as_deref(), Some("hi"));
        assert_eq!(cleared[0].new, None);

        let noop_clear = apply_writes(&mut conn, &item, &[write(&column, None)])
            .await
            .unwrap();
        assert!(noop_clear.is_empty());
        drop(conn);

        assert!(values_for_item(db.pool(), &item).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pivot_scoped_to_board() {
        let db = SqliteService::in_memory().await;
        let (owner, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let column = fixtures::text_column(db.pool(), &board_id, "Notes").await;
        let with_value = fixtures::item(db.pool(), &section, "a").await;
        let without = fixtures::item(db.pool(), &section, "b").await;
        fixtures::value(db.pool(), &with_value, &column, "x").await;

        let other_board = fixtures::board_for(db.pool(), &owner).await;
        let other_section = fixtures::section(db.pool(), &other_board, "S").await;
        let other_column = fixtures::text_column(db.pool(), &other_board, "Notes").await;
        let other_item = fixtures::item(db.pool(), &other_section, "z").await;
        fixtures::value(db.pool(), &other_item, &other_column, "y").await;

        let pivot = pivot_for_board(db.pool(), &board_id).await.unwrap();
        assert_eq!(pivot.len(), 1);
        assert_eq!(pivot[&with_value].get("Notes").map(String::as_str), Some("x"));
        assert!(!pivot.contains_key(&without));
    }
}
