//! Database-backed sermon listing API

use axum::{extract::State, Json};
use parish_common::db::queries;
use serde::Serialize;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SermonEpisode {
    pub id: String,
    pub title: String,
    pub author: String,
    pub scripture: Option<String>,
    pub date: String,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub apple_podcasts_url: Option<String>,
    /// First available listening link, in platform preference order
    pub link: Option<String>,
    pub podcast_thumbnail_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SermonsResponse {
    pub title: String,
    pub description: String,
    pub episodes: Vec<SermonEpisode>,
}

/// GET /api/sermons
///
/// All sermon rows, newest first.
pub async fn list_sermons(
    State(state): State<AppState>,
) -> Result<Json<SermonsResponse>, ApiError> {
    let rows = queries::list_sermons(&state.db).await?;

    let episodes = rows
        .into_iter()
        .map(|s| {
            let link = s
                .spotify_url
                .clone()
                .or_else(|| s.youtube_url.clone())
                .or_else(|| s.apple_podcasts_url.clone());
            SermonEpisode {
                id: s.id,
                title: s.title,
                author: s.author,
                scripture: s.scripture,
                date: s.date.format("%Y-%m-%d").to_string(),
                spotify_url: s.spotify_url,
                youtube_url: s.youtube_url,
                apple_podcasts_url: s.apple_podcasts_url,
                link,
                podcast_thumbnail_url: s.podcast_thumbnail_url,
            }
        })
        .collect();

    Ok(Json(SermonsResponse {
        title: "Sunday Sermons".to_string(),
        description: "Weekly sermons from our Sunday worship services".to_string(),
        episodes,
    }))
}
