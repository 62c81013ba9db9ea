//! Activity log repository for SQLite operations (append-only)

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{ActivityAction, ActivityRow, EntityKind, NewActivity};

pub async fn insert_activity(pool: &SqlitePool, entry: &NewActivity) -> Result<(), SqliteError> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        r#"
        INSERT INTO activity_logs (id, board_id, actor_id, action, entity_type, entity_id, old_value, new_value, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(cuid2::create_id())
    .bind(&entry.board_id)
    .bind(&entry.actor_id)
    .bind(entry.action.as_str())
    .bind(entry.entity_type.as_str())
    .bind(&entry.entity_id)
    .bind(entry.old_value.as_deref())
    .bind(entry.new_value.as_deref())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Latest entries for a board, newest first, with actor details
pub async fn list_for_board(
    pool: &SqlitePool,
    board_id: &str,
    limit: u32,
) -> Result<Vec<ActivityRow>, SqliteError> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            i64,
        ),
    >(
        r#"
        SELECT a.id, a.board_id, a.actor_id, u.name, u.email, a.action, a.entity_type,
               a.entity_id, a.old_value, a.new_value, a.created_at
        FROM activity_logs a
        JOIN users u ON u.id = a.actor_id
        WHERE a.board_id = ?
        ORDER BY a.created_at DESC, a.rowid DESC
        LIMIT ?
        "#,
    )
    .bind(board_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(
            |(
                id,
                board_id,
                actor_id,
                actor_name,
                actor_email,
                action,
                entity_type,
                entity_id,
                old_value,
                new_value,
                created_at,
            )| {
                let action = ActivityAction::parse(&action)
                    .ok_or_else(|| SqliteError::decode("activity_logs.action", &action))?;
                let entity_type = EntityKind::parse(&entity_type)
                    .ok_or_else(|| SqliteError::decode("activity_logs.entity_type", &entity_type))?;
                Ok(ActivityRow {
                    id,
                    board_id,
                    actor_id,
                    actor_name,
                    actor_email,
                    action,
                    entity_type,
                    entity_id,
                    old_value,
                    new_value,
                    created_at,
                })
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::fixtures;

    fn entry(board_id: &str, actor_id: &str, entity_id: &str) -> NewActivity {
        NewActivity {
            board_id: board_id.to_string(),
            actor_id: actor_id.to_string(),
            action: ActivityAction::Create,
            entity_type: EntityKind::Section,
            entity_id: entity_id.to_string(),
            old_value: None,
            new_value: Some("Todo".to_string()),
        }
    }

    #[tokio::test]
    async fn test_newest_first_with_limit() {
        let db = SqliteService::in_memory().await;
        let (owner, board_id) = fixtures::board(db.pool()).await;
        for i in 0..5 {
            insert_activity(db.pool(), &entry(&board_id, &owner, &format!("e{i}")))
                .await
                .unwrap();
        }

        let rows = list_for_board(db.pool(), &board_id, 3).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["e4", "e3", "e2"]);
        assert_eq!(rows[0].actor_name, "Owner");
        assert_eq!(rows[0].entity_type, EntityKind::Section);
    }
}
