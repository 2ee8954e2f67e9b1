//! Podcast series API

use axum::{
    extract::{Path, State},
    Json,
};
use parish_common::db::models::{PodcastEpisode, PodcastSeries};
use parish_common::db::queries;
use serde::Serialize;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PodcastSeriesResponse {
    pub series: PodcastSeries,
    pub episodes: Vec<PodcastEpisode>,
}

/// GET /api/podcasts/:series
///
/// Episodes of the series whose slug matches the path segment, e.g.
/// `/api/podcasts/beyond-podcast` for the series titled "Beyond Podcast".
pub async fn get_podcast_series(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PodcastSeriesResponse>, ApiError> {
    let all: Vec<PodcastSeries> =
        sqlx::query_as("SELECT * FROM podcast_series ORDER BY title ASC")
            .fetch_all(&state.db)
            .await
            .map_err(|e| ApiError::Database(e.to_string()))?;

    let series = all
        .into_iter()
        .find(|s| slugify(&s.title) == slug)
        .ok_or_else(|| ApiError::NotFound(format!("podcast series {}", slug)))?;

    let episodes = queries::list_episodes_for_series(&state.db, series.id).await?;
    Ok(Json(PodcastSeriesResponse { series, episodes }))
}

/// Lowercase the title and collapse non-alphanumeric runs to single hyphens
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Beyond Podcast"), "beyond-podcast");
        assert_eq!(slugify("What We Believe!"), "what-we-believe");
        assert_eq!(slugify("  Walking   with Jesus "), "walking-with-jesus");
    }
}
