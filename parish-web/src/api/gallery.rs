//! Gallery API

use axum::{
    extract::{Query, State},
    Json,
};
use parish_common::db::models::GalleryImage;
use parish_common::db::queries;
use serde::Deserialize;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    /// When true, only event photos are returned
    #[serde(default)]
    pub event: bool,
}

/// GET /api/gallery
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    let images = queries::list_gallery_images(&state.db, query.event).await?;
    Ok(Json(images))
}
