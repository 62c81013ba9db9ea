//! Database migration system
//!
//! Version 1 is the initial schema. Later versions are applied in order, each in its
//! own transaction, and recorded with a checksum in `schema_migrations`.

use sqlx::SqlitePool;

use super::error::SqliteError;
use super::schema::{SCHEMA, SCHEMA_VERSION};
use crate::utils::crypto::sha256_hex;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteError> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        tracing::debug!(version = SCHEMA_VERSION, "Initializing database schema");
        apply_initial_schema(pool).await?;
        return Ok(());
    }

    let current_version: i32 =
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    if current_version > SCHEMA_VERSION {
        return Err(SqliteError::MigrationFailed {
            version: current_version,
            name: "version_check".to_string(),
            error: format!(
                "database schema v{} is newer than this binary supports (v{})",
                current_version, SCHEMA_VERSION
            ),
        });
    }

    if current_version == SCHEMA_VERSION {
        tracing::debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        tracing::debug!(version, "Applying migration");
        apply_migration(version)?;
    }

    Ok(())
}

/// Apply the initial schema (version 1)
async fn apply_initial_schema(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(SCHEMA).execute(&mut *tx).await?;

    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description) VALUES (1, ?, ?, 'Initial schema')",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let elapsed_ms = start.elapsed().as_millis() as i64;
    record_migration(&mut tx, SCHEMA_VERSION, "initial_schema", SCHEMA, now, elapsed_ms).await?;

    tx.commit().await?;
    tracing::debug!(elapsed_ms, "Applied initial schema");
    Ok(())
}

fn apply_migration(version: i32) -> Result<(), SqliteError> {
    match version {
        // Covered by the initial schema
        1 => Ok(()),
        _ => Err(SqliteError::MigrationFailed {
            version,
            name: "unknown".to_string(),
            error: format!("Unknown migration version: {}", version),
        }),
    }
}

async fn record_migration(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    version: i32,
    name: &str,
    sql: &str,
    applied_at: i64,
    elapsed_ms: i64,
) -> Result<(), SqliteError> {
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success) VALUES (?, ?, ?, ?, ?, 1)",
    )
    .bind(version)
    .bind(name)
    .bind(applied_at)
    .bind(sha256_hex(sql))
    .bind(elapsed_ms)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
