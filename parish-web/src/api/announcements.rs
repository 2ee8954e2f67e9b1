//! Announcements API

use axum::{extract::State, Json};
use parish_common::db::models::Announcement;
use parish_common::db::queries;

use super::ApiError;
use crate::AppState;

/// GET /api/announcements
///
/// Active announcements, superfeatured first, newest first within each group.
pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    let announcements = queries::list_active_announcements(&state.db).await?;
    Ok(Json(announcements))
}
