//! Database models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date_entered: NaiveDateTime,
    pub active: bool,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub superfeatured: bool,
    pub featured_image: Option<String>,
    pub image_display_type: Option<String>,
    pub show_in_banner: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SermonRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub scripture: Option<String>,
    pub date: NaiveDate,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub apple_podcasts_url: Option<String>,
    pub podcast_thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PodcastSeries {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PodcastEpisode {
    pub id: i64,
    pub series_id: Option<i64>,
    pub number: Option<i64>,
    pub title: String,
    pub link: Option<String>,
    pub listen_url: Option<String>,
    pub handout_url: Option<String>,
    pub guest: Option<String>,
    pub date_added: Option<NaiveDate>,
    pub season: Option<i64>,
    pub scripture: Option<String>,
    pub podcast_thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GalleryImage {
    pub id: i64,
    pub name: Option<String>,
    pub url: String,
    pub size: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub tags: Json<Vec<String>>,
    pub event: bool,
    pub created: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OngoingEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date_entered: NaiveDateTime,
    pub active: bool,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
