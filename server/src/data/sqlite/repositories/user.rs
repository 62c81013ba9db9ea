//! User repository for SQLite operations
//!
//! Emails are stored case-folded; callers fold before lookup. Users are never
//! hard-deleted, deactivation flips `is_active` and renames the account.

use sqlx::SqlitePool;

use crate::core::constants::DEACTIVATED_USER_PREFIX;
use crate::data::sqlite::SqliteError;
use crate::data::types::{NewUser, UserRole, UserRow, UserUpdate};

type UserTuple = (String, String, String, String, i64, i64, i64);

const USER_COLUMNS: &str = "id, name, email, role, is_active, created_at, updated_at";

fn row_to_user(row: UserTuple) -> Result<UserRow, SqliteError> {
    let (id, name, email, role, is_active, created_at, updated_at) = row;
    let role = UserRole::parse(&role).ok_or_else(|| SqliteError::decode("users.role", &role))?;
    Ok(UserRow {
        id,
        name,
        email,
        role,
        is_active: is_active != 0,
        created_at,
        updated_at,
    })
}

/// Create a new user with a generated CUID2 ID
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<UserRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(&id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, "Email is already in use"))?;

    Ok(UserRow {
        id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

/// Get a user by ID (active or not)
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(row_to_user).transpose()
}

/// Get a user by case-folded email
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, SqliteError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    row.map(row_to_user).transpose()
}

/// User plus stored password hash, for credential checks
pub async fn get_credentials(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<(UserRow, String)>, SqliteError> {
    let row = sqlx::query_as::<_, (String, String, String, String, i64, i64, i64, String)>(
        "SELECT id, name, email, role, is_active, created_at, updated_at, password_hash FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((id, name, email, role, is_active, created_at, updated_at, hash)) => {
            let user = row_to_user((id, name, email, role, is_active, created_at, updated_at))?;
            Ok(Some((user, hash)))
        }
        None => Ok(None),
    }
}

/// Active users ordered by name
pub async fn list_active(pool: &SqlitePool) -> Result<Vec<UserRow>, SqliteError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE is_active = 1 ORDER BY name, email");
    let rows = sqlx::query_as::<_, UserTuple>(&sql).fetch_all(pool).await?;
    rows.into_iter().map(row_to_user).collect()
}

/// Apply a partial update. Returns `None` when the user does not exist.
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: &UserUpdate,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE(?, name),
            email = COALESCE(?, email),
            role = COALESCE(?, role),
            password_hash = COALESCE(?, password_hash),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.name.as_deref())
    .bind(update.email.as_deref())
    .bind(update.role.map(|r| r.as_str()))
    .bind(update.password_hash.as_deref())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, "Email is already in use"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user(pool, id).await
}

/// Soft-delete: mark inactive and rename to "Deactivated User (name)"
///
/// Returns `None` when the user does not exist. Already-deactivated users are
/// returned unchanged.
pub async fn deactivate_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE users SET is_active = 0, name = ? || ' (' || name || ')', updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(DEACTIVATED_USER_PREFIX)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    get_user(pool, id).await
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Member,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = SqliteService::in_memory().await;
        let created = create_user(db.pool(), &new_user("Ada", "ada@example.com"))
            .await
            .unwrap();

        let by_id = get_user(db.pool(), &created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");
        assert!(by_id.is_active);
        assert_eq!(by_id.role, UserRole::Member);

        let (by_email, hash) = get_credentials(db.pool(), "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let db = SqliteService::in_memory().await;
        create_user(db.pool(), &new_user("Ada", "ada@example.com"))
            .await
            .unwrap();
        let err = create_user(db.pool(), &new_user("Other", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = SqliteService::in_memory().await;
        let user = create_user(db.pool(), &new_user("Ada", "ada@example.com"))
            .await
            .unwrap();

        let update = UserUpdate {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        let updated = update_user(db.pool(), &user.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.role, UserRole::Admin);

        assert!(
            update_user(db.pool(), "missing", &update)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_deactivate_renames_and_hides() {
        let db = SqliteService::in_memory().await;
        let ada = create_user(db.pool(), &new_user("Ada", "ada@example.com"))
            .await
            .unwrap();
        create_user(db.pool(), &new_user("Bob", "bob@example.com"))
            .await
            .unwrap();

        let deactivated = deactivate_user(db.pool(), &ada.id).await.unwrap().unwrap();
        assert!(!deactivated.is_active);
        assert_eq!(deactivated.name, "Deactivated User (Ada)");

        // Second call leaves the name alone
        let again = deactivate_user(db.pool(), &ada.id).await.unwrap().unwrap();
        assert_eq!(again.name, "Deactivated User (Ada)");

        let active = list_active(db.pool()).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Bob");
        assert_eq!(count_users(db.pool()).await.unwrap(), 2);
    }
}
