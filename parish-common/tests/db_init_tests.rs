//! Tests for database initialization and migrations

use parish_common::db::init::{get_setting, init_database};
use std::path::PathBuf;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let test_db = format!("/tmp/parish-test-db-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    // Ensure database doesn't exist
    let _ = std::fs::remove_file(&db_path);

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let test_db = format!("/tmp/parish-test-db-existing-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    // Second init is idempotent
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    drop(pool1);
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_default_settings_initialized() {
    let test_db = format!("/tmp/parish-test-db-settings-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    let host = get_setting(&pool, "http_host").await.unwrap();
    assert_eq!(host.as_deref(), Some("127.0.0.1"));

    let port = get_setting(&pool, "http_port").await.unwrap();
    assert_eq!(port.as_deref(), Some("5780"));

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_migrations_add_columns() {
    let test_db = format!("/tmp/parish-test-db-migrations-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    // Columns added by migrations v2/v3 must exist after init
    let sort_order: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('ongoing_events') WHERE name = 'sort_order'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(sort_order, 1, "sort_order column missing from ongoing_events");

    let show_in_banner: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('announcements') WHERE name = 'show_in_banner'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(show_in_banner, 1, "show_in_banner column missing from announcements");

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, 3);

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_counter_row_initialized() {
    let test_db = format!("/tmp/parish-test-db-counter-row-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    let last_issued: i64 = sqlx::query_scalar("SELECT last_issued FROM content_id_counter")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(last_issued, 0);

    // Re-running init must not reset an advanced counter
    parish_common::db::allocate_content_id(&pool).await.unwrap();
    drop(pool);
    let pool = init_database(&db_path).await.unwrap();
    let last_issued: i64 = sqlx::query_scalar("SELECT last_issued FROM content_id_counter")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(last_issued, 1);

    let _ = std::fs::remove_file(&db_path);
}
