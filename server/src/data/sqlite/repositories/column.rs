//! Custom column repository for SQLite operations
//!
//! Column options are stored as a JSON text array. Names are unique per board.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::ordering::SiblingScope;
use crate::data::types::{ColumnDefinition, ColumnRow, ColumnType, ColumnUpdate, MoveOutcome};

const DUPLICATE_NAME: &str = "A column with this name already exists on the board";

type ColumnTuple = (String, String, String, String, i64, String, Option<String>, i64, i64);

const COLUMN_COLUMNS: &str =
    "id, board_id, name, data_type, position, options, formula_expression, created_at, updated_at";

fn row_to_column(row: ColumnTuple) -> Result<ColumnRow, SqliteError> {
    let (id, board_id, name, data_type, position, options, formula_expression, created_at, updated_at) =
        row;
    let data_type = ColumnType::parse(&data_type)
        .ok_or_else(|| SqliteError::decode("board_columns.data_type", &data_type))?;
    let options: Vec<String> = serde_json::from_str(&options)
        .map_err(|_| SqliteError::decode("board_columns.options", &options))?;
    Ok(ColumnRow {
        id,
        board_id,
        name,
        data_type,
        position,
        options,
        formula_expression,
        created_at,
        updated_at,
    })
}

fn encode_options(options: &[String]) -> String {
    serde_json::Value::from(options.to_vec()).to_string()
}

/// Append a column definition at the end of its board
pub async fn create_column(
    pool: &SqlitePool,
    board_id: &str,
    def: &ColumnDefinition,
) -> Result<ColumnRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;
    let scope = SiblingScope::COLUMNS;
    scope.lock(&mut tx, board_id).await?;
    let position = scope.next_position(&mut tx, board_id).await?;

    sqlx::query(
        "INSERT INTO board_columns (id, board_id, name, data_type, position, options, formula_expression, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(board_id)
    .bind(&def.name)
    .bind(def.data_type.as_str())
    .bind(position)
    .bind(encode_options(&def.options))
    .bind(def.formula_expression.as_deref())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, DUPLICATE_NAME))?;
    tx.commit().await?;

    Ok(ColumnRow {
        id,
        board_id: board_id.to_string(),
        name: def.name.clone(),
        data_type: def.data_type,
        position,
        options: def.options.clone(),
        formula_expression: def.formula_expression.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_column(pool: &SqlitePool, id: &str) -> Result<Option<ColumnRow>, SqliteError> {
    let sql = format!("SELECT {COLUMN_COLUMNS} FROM board_columns WHERE id = ?");
    let row = sqlx::query_as::<_, ColumnTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(row_to_column).transpose()
}

/// Column definitions of a board in rank order
pub async fn list_columns(pool: &SqlitePool, board_id: &str) -> Result<Vec<ColumnRow>, SqliteError> {
    let sql = format!("SELECT {COLUMN_COLUMNS} FROM board_columns WHERE board_id = ? ORDER BY position");
    let rows = sqlx::query_as::<_, ColumnTuple>(&sql)
        .bind(board_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(row_to_column).collect()
}

/// Replace a column definition and prune values it no longer accepts
///
/// The write only happens while the stored definition still equals `expected`;
/// otherwise the current row comes back as [`ColumnUpdate::Stale`]. Values are
/// pruned when the column is (or stays) SELECT and a stored value is not among
/// the new options.
pub async fn update_column(
    pool: &SqlitePool,
    id: &str,
    expected: &ColumnDefinition,
    def: &ColumnDefinition,
) -> Result<Option<ColumnUpdate>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;
    let select = format!("SELECT {COLUMN_COLUMNS} FROM board_columns WHERE id = ?");

    // Write first so the snapshot read below cannot go stale
    sqlx::query("UPDATE board_columns SET position = position WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let before = sqlx::query_as::<_, ColumnTuple>(&select)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(before) = before.map(row_to_column).transpose()? else {
        return Ok(None);
    };
    if before.definition() != *expected {
        tx.rollback().await?;
        return Ok(Some(ColumnUpdate::Stale(before)));
    }

    sqlx::query(
        "UPDATE board_columns SET name = ?, data_type = ?, options = ?, formula_expression = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&def.name)
    .bind(def.data_type.as_str())
    .bind(encode_options(&def.options))
    .bind(def.formula_expression.as_deref())
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, DUPLICATE_NAME))?;

    let pruned = if def.data_type == ColumnType::Select {
        sqlx::query(
            r#"
            DELETE FROM item_values
            WHERE column_id = ?
              AND value NOT IN (SELECT value FROM json_each(?))
            "#,
        )
        .bind(id)
        .bind(encode_options(&def.options))
        .execute(&mut *tx)
        .await?
        .rows_affected()
    } else {
        0
    };

    let after = row_to_column(
        sqlx::query_as::<_, ColumnTuple>(&select)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?,
    )?;
    tx.commit().await?;

    Ok(Some(ColumnUpdate::Applied {
        before,
        after,
        pruned,
    }))
}

/// Delete a column (its values cascade) and re-rank the rest
pub async fn delete_column(pool: &SqlitePool, id: &str) -> Result<Option<ColumnRow>, SqliteError> {
    let mut tx = pool.begin().await?;
    SiblingScope::COLUMNS.lock_of(&mut tx, id).await?;

    let sql = format!("SELECT {COLUMN_COLUMNS} FROM board_columns WHERE id = ?");
    let row = sqlx::query_as::<_, ColumnTuple>(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(row) = row.map(row_to_column).transpose()? else {
        return Ok(None);
    };

    SiblingScope::COLUMNS.remove(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Some(row))
}

/// Move a column to a new rank within its board
pub async fn move_column(
    pool: &SqlitePool,
    id: &str,
    target: i64,
) -> Result<Option<MoveOutcome>, SqliteError> {
    let mut tx = pool.begin().await?;
    let outcome = SiblingScope::COLUMNS.move_within(&mut tx, id, target).await?;
    tx.commit().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    fn select(name: &str, options: &[&str]) -> ColumnDefinition {
        ColumnDefinition {
            name: name.to_string(),
            data_type: ColumnType::Select,
            options: options.iter().map(|o| o.to_string()).collect(),
            formula_expression: None,
        }
    }

    fn text(name: &str) -> ColumnDefinition {
        ColumnDefinition {
            name: name.to_string(),
            data_type: ColumnType::Text,
            options: Vec::new(),
            formula_expression: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_in_order() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;

        create_column(db.pool(), &board_id, &select("Status", &["A", "B"]))
            .await
            .unwrap();
        create_column(db.pool(), &board_id, &text("Notes")).await.unwrap();

        let columns = list_columns(db.pool(), &board_id).await.unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "Status");
        assert_eq!(columns[0].options, vec!["A", "B"]);
        assert_eq!(columns[1].position, 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        create_column(db.pool(), &board_id, &text("Notes")).await.unwrap();

        let err = create_column(db.pool(), &board_id, &text("Notes"))
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_options_prunes_values() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let column = create_column(db.pool(), &board_id, &select("Status", &["A", "B"]))
            .await
            .unwrap();
        let item_a = fixtures::item(db.pool(), &section, "a").await;
        let item_b = fixtures::item(db.pool(), &section, "b").await;
        fixtures::value(db.pool(), &item_a, &column.id, "A").await;
        fixtures::value(db.pool(), &item_b, &column.id, "B").await;

        let update = update_column(
            db.pool(),
            &column.id,
            &column.definition(),
            &select("Status", &["A", "C"]),
        )
        .await
        .unwrap()
        .unwrap();
        let ColumnUpdate::Applied {
            before,
            after,
            pruned,
        } = update
        else {
            panic!("expected applied update");
        };
        assert_eq!(before.options, vec!["A", "B"]);
        assert_eq!(after.options, vec!["A", "C"]);
        assert_eq!(pruned, 1);

        let left: Vec<String> = sqlx::query_scalar("SELECT value FROM item_values")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(left, vec!["A"]);
    }

    #[tokio::test]
    async fn test_update_with_outdated_definition_is_stale() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let column = create_column(db.pool(), &board_id, &select("Status", &["A", "B"]))
            .await
            .unwrap();
        let outdated = column.definition();

        update_column(db.pool(), &column.id, &outdated, &select("State", &["A", "B"]))
            .await
            .unwrap()
            .unwrap();

        let update = update_column(db.pool(), &column.id, &outdated, &select("Status", &["X"]))
            .await
            .unwrap()
            .unwrap();
        let ColumnUpdate::Stale(current) = update else {
            panic!("expected stale update");
        };
        assert_eq!(current.name, "State");
        assert_eq!(current.options, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_delete_column_reranks_and_drops_values() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let section = fixtures::section(db.pool(), &board_id, "S").await;
        let first = create_column(db.pool(), &board_id, &text("One")).await.unwrap();
        create_column(db.pool(), &board_id, &text("Two")).await.unwrap();
        let item = fixtures::item(db.pool(), &section, "a").await;
        fixtures::value(db.pool(), &item, &first.id, "x").await;

        delete_column(db.pool(), &first.id).await.unwrap().unwrap();

        let columns = list_columns(db.pool(), &board_id).await.unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].position, 0);
        let values: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_values")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(values, 0);
    }

    #[tokio::test]
    async fn test_move_column_unchanged_rank() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let first = create_column(db.pool(), &board_id, &text("One")).await.unwrap();
        create_column(db.pool(), &board_id, &text("Two")).await.unwrap();

        let outcome = move_column(db.pool(), &first.id, 0).await.unwrap().unwrap();
        assert!(!outcome.moved());
        let outcome = move_column(db.pool(), &first.id, 1).await.unwrap().unwrap();
        assert!(outcome.moved());
        assert_eq!(list_columns(db.pool(), &board_id).await.unwrap()[0].name, "Two");
    }
}
