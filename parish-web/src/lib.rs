//! parish-web library - public JSON API for the church website

use axum::Router;
use parish_common::archive::ArchiveStore;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Sermon archive document store
    pub archive: Arc<ArchiveStore>,
}

impl AppState {
    pub fn new(db: SqlitePool, archive: Arc<ArchiveStore>) -> Self {
        Self { db, archive }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/announcements", get(api::list_announcements))
        .route("/api/ongoing-events", get(api::list_ongoing_events))
        .route("/api/sermons", get(api::list_sermons))
        .route("/api/archive", get(api::get_archive))
        .route("/api/archive/years/:year", get(api::get_archive_year))
        .route("/api/podcasts/:series", get(api::get_podcast_series))
        .route("/api/gallery", get(api::list_gallery))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
