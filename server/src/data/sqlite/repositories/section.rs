//! Section repository for SQLite operations
//!
//! Sections are ranked within their board through [`SiblingScope::SECTIONS`].

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::ordering::SiblingScope;
use crate::data::types::{MoveOutcome, SectionRow, SectionWithCount};

type SectionTuple = (String, String, String, i64, i64, i64);

fn row_to_section(row: SectionTuple) -> SectionRow {
    let (id, board_id, name, position, created_at, updated_at) = row;
    SectionRow {
        id,
        board_id,
        name,
        position,
        created_at,
        updated_at,
    }
}

/// Append a section at the end of its board
pub async fn create_section(
    pool: &SqlitePool,
    board_id: &str,
    name: &str,
) -> Result<SectionRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;
    let scope = SiblingScope::SECTIONS;
    scope.lock(&mut tx, board_id).await?;
    let position = scope.next_position(&mut tx, board_id).await?;

    sqlx::query(
        "INSERT INTO sections (id, board_id, name, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(board_id)
    .bind(name)
    .bind(position)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(SectionRow {
        id,
        board_id: board_id.to_string(),
        name: name.to_string(),
        position,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_section(pool: &SqlitePool, id: &str) -> Result<Option<SectionRow>, SqliteError> {
    let row = sqlx::query_as::<_, SectionTuple>(
        "SELECT id, board_id, name, position, created_at, updated_at FROM sections WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(row_to_section))
}

/// Sections of a board in rank order
pub async fn list_sections(
    pool: &SqlitePool,
    board_id: &str,
) -> Result<Vec<SectionRow>, SqliteError> {
    let rows = sqlx::query_as::<_, SectionTuple>(
        "SELECT id, board_id, name, position, created_at, updated_at FROM sections WHERE board_id = ? ORDER BY position",
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_section).collect())
}

/// Sections of a board in rank order with their item counts
pub async fn list_with_counts(
    pool: &SqlitePool,
    board_id: &str,
) -> Result<Vec<SectionWithCount>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, String, i64, i64, i64, i64)>(
        r#"
        SELECT s.id, s.board_id, s.name, s.position, s.created_at, s.updated_at,
               (SELECT COUNT(*) FROM items i WHERE i.section_id = s.id) AS item_count
        FROM sections s
        WHERE s.board_id = ?
        ORDER BY s.position
        "#,
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, board_id, name, position, created_at, updated_at, item_count)| SectionWithCount {
                section: row_to_section((id, board_id, name, position, created_at, updated_at)),
                item_count,
            },
        )
        .collect())
}

/// Rename a section. Returns (before, after), `None` when missing.
pub async fn rename_section(
    pool: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<(SectionRow, SectionRow)>, SqliteError> {
    let Some(before) = get_section(pool, id).await? else {
        return Ok(None);
    };
    if before.name == name {
        return Ok(Some((before.clone(), before)));
    }

    let now = chrono::Utc::now().timestamp();
    sqlx::query("UPDATE sections SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    let after = SectionRow {
        name: name.to_string(),
        updated_at: now,
        ..before.clone()
    };
    Ok(Some((before, after)))
}

/// Delete a section (its items cascade) and re-rank the rest
pub async fn delete_section(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<SectionRow>, SqliteError> {
    let mut tx = pool.begin().await?;
    SiblingScope::SECTIONS.lock_of(&mut tx, id).await?;

    let row = sqlx::query_as::<_, SectionTuple>(
        "SELECT id, board_id, name, position, created_at, updated_at FROM sections WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(row) = row.map(row_to_section) else {
        return Ok(None);
    };

    SiblingScope::SECTIONS.remove(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Some(row))
}

/// Move a section to a new rank within its board
pub async fn move_section(
    pool: &SqlitePool,
    id: &str,
    target: i64,
) -> Result<Option<MoveOutcome>, SqliteError> {
    let mut tx = pool.begin().await?;
    let outcome = SiblingScope::SECTIONS.move_within(&mut tx, id, target).await?;
    tx.commit().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    async fn names(pool: &SqlitePool, board_id: &str) -> Vec<(String, i64)> {
        list_sections(pool, board_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| (s.name, s.position))
            .collect()
    }

    #[tokio::test]
    async fn test_create_appends_at_end() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;

        for name in ["Todo", "Doing", "Done"] {
            create_section(db.pool(), &board_id, name).await.unwrap();
        }
        assert_eq!(
            names(db.pool(), &board_id).await,
            vec![
                ("Todo".to_string(), 0),
                ("Doing".to_string(), 1),
                ("Done".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_middle_section_reranks() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D"] {
            ids.push(create_section(db.pool(), &board_id, name).await.unwrap().id);
        }

        let deleted = delete_section(db.pool(), &ids[1]).await.unwrap().unwrap();
        assert_eq!(deleted.position, 1);
        assert_eq!(
            names(db.pool(), &board_id).await,
            vec![
                ("A".to_string(), 0),
                ("C".to_string(), 1),
                ("D".to_string(), 2)
            ]
        );
        assert!(delete_section(db.pool(), &ids[1]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_counts() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let first = create_section(db.pool(), &board_id, "A").await.unwrap();
        create_section(db.pool(), &board_id, "B").await.unwrap();
        fixtures::item(db.pool(), &first.id, "one").await;
        fixtures::item(db.pool(), &first.id, "two").await;

        let counts: Vec<i64> = list_with_counts(db.pool(), &board_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.item_count)
            .collect();
        assert_eq!(counts, vec![2, 0]);
    }

    #[tokio::test]
    async fn test_move_section_to_front() {
        let db = SqliteService::in_memory().await;
        let (_, board_id) = fixtures::board(db.pool()).await;
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            ids.push(create_section(db.pool(), &board_id, name).await.unwrap().id);
        }

        let outcome = move_section(db.pool(), &ids[2], 0).await.unwrap().unwrap();
        assert!(outcome.moved());
        assert_eq!(
            names(db.pool(), &board_id).await,
            vec![
                ("C".to_string(), 0),
                ("A".to_string(), 1),
                ("B".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let db = std::sync::Arc::new(
            SqliteService::open(&dir.path().join("ranks.db"), 4)
                .await
                .unwrap(),
        );
        let (_, board_id) = fixtures::board(db.pool()).await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let db = db.clone();
            let board_id = board_id.clone();
            handles.push(tokio::spawn(async move {
                create_section(db.pool(), &board_id, &format!("S{i}"))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ranks: Vec<i64> = names(db.pool(), &board_id)
            .await
            .into_iter()
            .map(|(_, r)| r)
            .collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..8).collect::<Vec<_>>());
    }
}
