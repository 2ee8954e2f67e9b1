//! Database schema migrations.
//!
//! Versioned migrations allow seamless upgrades of existing databases
//! without manual deletion or data loss.
//!
//! Guidelines:
//! 1. Never modify existing migrations - they must remain stable for users
//!    upgrading from older versions
//! 2. Always add new migrations - one function per schema change
//! 3. Prefer ALTER TABLE over DROP/CREATE to preserve data
//! 4. Check `pragma_table_info` before ALTER TABLE so reruns are no-ops

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// Increment this when adding new migrations
const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }
    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("✓ Migration v2 completed");
    }
    if current_version < 3 {
        migrate_v3(pool).await?;
        set_schema_version(pool, 3).await?;
        info!("✓ Migration v3 completed");
    }

    Ok(())
}

/// v1: baseline schema marker
///
/// Table creation is handled by the idempotent CREATE TABLE IF NOT EXISTS
/// pass; this version only records that the baseline has been applied.
async fn migrate_v1(_pool: &SqlitePool) -> Result<()> {
    Ok(())
}

/// v2: ordering control for ongoing events
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    if !column_exists(pool, "ongoing_events", "sort_order").await? {
        sqlx::query("ALTER TABLE ongoing_events ADD COLUMN sort_order INTEGER NOT NULL DEFAULT 0")
            .execute(pool)
            .await?;
        info!("Migration v2: Added sort_order to ongoing_events table");
    }
    Ok(())
}

/// v3: banner and image display controls for announcements
async fn migrate_v3(pool: &SqlitePool) -> Result<()> {
    if !column_exists(pool, "announcements", "image_display_type").await? {
        sqlx::query("ALTER TABLE announcements ADD COLUMN image_display_type TEXT")
            .execute(pool)
            .await?;
        info!("Migration v3: Added image_display_type to announcements table");
    }
    if !column_exists(pool, "announcements", "show_in_banner").await? {
        sqlx::query(
            "ALTER TABLE announcements ADD COLUMN show_in_banner INTEGER NOT NULL DEFAULT 0",
        )
        .execute(pool)
        .await?;
        info!("Migration v3: Added show_in_banner to announcements table");
    }
    Ok(())
}

async fn column_exists(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}
