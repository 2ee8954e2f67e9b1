//! Ongoing events API

use axum::{extract::State, Json};
use parish_common::db::models::OngoingEvent;
use parish_common::db::queries;

use super::ApiError;
use crate::AppState;

/// GET /api/ongoing-events
///
/// Active events in their configured sort order.
pub async fn list_ongoing_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<OngoingEvent>>, ApiError> {
    let events = queries::list_active_events(&state.db).await?;
    Ok(Json(events))
}
