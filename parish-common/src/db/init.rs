//! Database initialization.
//!
//! Creates the database on first run, applies idempotent schema creation,
//! runs versioned migrations, and seeds default settings.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_schema_version_table(&pool).await?;
    create_settings_table(&pool).await?;
    create_content_id_counter_table(&pool).await?;
    create_announcements_table(&pool).await?;
    create_sermons_table(&pool).await?;
    create_podcast_series_table(&pool).await?;
    create_podcast_episodes_table(&pool).await?;
    create_gallery_images_table(&pool).await?;
    create_ongoing_events_table(&pool).await?;

    // Versioned migrations for schema changes on existing databases
    crate::db::migrations::run_migrations(&pool).await?;

    // Default settings
    init_default_settings(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the content ID counter table and its single row.
///
/// `last_issued` starts at 0 so the first allocation returns 1. The CHECK
/// constraint pins the table to one row.
async fn create_content_id_counter_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_id_counter (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            last_issued INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO content_id_counter (id, last_issued) VALUES (1, 0)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_announcements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS announcements (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            date_entered TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            active INTEGER NOT NULL DEFAULT 1,
            type TEXT,
            category TEXT,
            tag TEXT,
            superfeatured INTEGER NOT NULL DEFAULT 0,
            featured_image TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_sermons_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sermons (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            scripture TEXT,
            date DATE NOT NULL,
            spotify_url TEXT,
            youtube_url TEXT,
            apple_podcasts_url TEXT,
            podcast_thumbnail_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_podcast_series_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS podcast_series (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_podcast_episodes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS podcast_episodes (
            id INTEGER PRIMARY KEY,
            series_id INTEGER REFERENCES podcast_series(id),
            number INTEGER,
            title TEXT NOT NULL,
            link TEXT,
            listen_url TEXT,
            handout_url TEXT,
            guest TEXT,
            date_added DATE,
            season INTEGER,
            scripture TEXT,
            podcast_thumbnail_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_gallery_images_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gallery_images (
            id INTEGER PRIMARY KEY,
            name TEXT,
            url TEXT NOT NULL UNIQUE,
            size TEXT,
            type TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            event INTEGER NOT NULL DEFAULT 0,
            created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_ongoing_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ongoing_events (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            date_entered TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            active INTEGER NOT NULL DEFAULT 1,
            type TEXT,
            category TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist with default values.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // HTTP server settings
    ensure_setting(pool, "http_host", "127.0.0.1").await?;
    ensure_setting(pool, "http_port", "5780").await?;

    // Ingestion settings
    ensure_setting(pool, "ingest_user_agent", "parish-web (+https://example.org)").await?;
    ensure_setting(pool, "ingest_timeout_ms", "10000").await?;
    ensure_setting(pool, "podcast_rss_url", "").await?;
    ensure_setting(pool, "youtube_channel_id", "").await?;

    // Backup settings
    ensure_setting(pool, "backup_retention_count", "3").await?;

    Ok(())
}

/// Insert a setting if missing; reset a NULL value to its default
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(default_value)
        .execute(pool)
        .await?;

    sqlx::query("UPDATE settings SET value = ? WHERE key = ? AND value IS NULL")
        .bind(default_value)
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Read a setting value, if present
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}
