//! Sermon archive API.
//!
//! Serves the year-partitioned archive document. The flat `sermons` array
//! is oldest-year-first while each bucket is newest-first; both orderings
//! are part of the served contract.

use axum::{
    extract::{Path, State},
    Json,
};
use parish_common::archive::{ArchiveDocument, SermonRecord};

use super::ApiError;
use crate::AppState;

/// GET /api/archive
pub async fn get_archive(State(state): State<AppState>) -> Result<Json<ArchiveDocument>, ApiError> {
    let document = state.archive.load()?;
    Ok(Json(document))
}

/// GET /api/archive/years/:year
///
/// One year bucket, newest first.
pub async fn get_archive_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Vec<SermonRecord>>, ApiError> {
    let document = state.archive.load()?;
    match document.sermons_by_year.get(&year) {
        Some(bucket) => Ok(Json(bucket.clone())),
        None => Err(ApiError::NotFound(format!("archive year {}", year))),
    }
}
