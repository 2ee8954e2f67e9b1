//! Content table queries.
//!
//! Insert paths take a `&mut SqliteConnection` so the content ID allocation
//! and the row insert share one transaction: both commit or both roll back.

use super::counter::next_content_id;
use super::models::{Announcement, GalleryImage, OngoingEvent, PodcastEpisode, PodcastSeries, SermonRow};
use crate::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{SqliteConnection, SqlitePool};

// ------------------------------------------------------------------
// Announcements
// ------------------------------------------------------------------

/// Fields for a new announcement; the ID comes from the content counter
#[derive(Debug, Clone, Default)]
pub struct NewAnnouncement {
    pub title: String,
    pub description: String,
    pub date_entered: Option<NaiveDateTime>,
    pub active: bool,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub superfeatured: bool,
    pub featured_image: Option<String>,
    pub image_display_type: Option<String>,
    pub show_in_banner: bool,
}

pub async fn list_active_announcements(pool: &SqlitePool) -> Result<Vec<Announcement>> {
    let rows = sqlx::query_as::<_, Announcement>(
        "SELECT * FROM announcements WHERE active = 1 \
         ORDER BY superfeatured DESC, date_entered DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_announcement_by_title(
    conn: &mut SqliteConnection,
    title: &str,
) -> Result<Option<Announcement>> {
    let row = sqlx::query_as::<_, Announcement>("SELECT * FROM announcements WHERE title = ?")
        .bind(title)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn insert_announcement(
    conn: &mut SqliteConnection,
    new: &NewAnnouncement,
) -> Result<i64> {
    let id = next_content_id(conn).await?;
    sqlx::query(
        r#"
        INSERT INTO announcements
            (id, title, description, date_entered, active, type, category, tag,
             superfeatured, featured_image, image_display_type, show_in_banner)
        VALUES (?, ?, ?, COALESCE(?, CURRENT_TIMESTAMP), ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.date_entered)
    .bind(new.active)
    .bind(&new.kind)
    .bind(&new.category)
    .bind(&new.tag)
    .bind(new.superfeatured)
    .bind(&new.featured_image)
    .bind(&new.image_display_type)
    .bind(new.show_in_banner)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn update_announcement(
    conn: &mut SqliteConnection,
    id: i64,
    new: &NewAnnouncement,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE announcements SET
            description = ?, active = ?, type = ?, category = ?, tag = ?,
            superfeatured = ?, featured_image = ?, image_display_type = ?,
            show_in_banner = ?
        WHERE id = ?
        "#,
    )
    .bind(&new.description)
    .bind(new.active)
    .bind(&new.kind)
    .bind(&new.category)
    .bind(&new.tag)
    .bind(new.superfeatured)
    .bind(&new.featured_image)
    .bind(&new.image_display_type)
    .bind(new.show_in_banner)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

// ------------------------------------------------------------------
// Ongoing events
// ------------------------------------------------------------------

pub async fn list_active_events(pool: &SqlitePool) -> Result<Vec<OngoingEvent>> {
    let rows = sqlx::query_as::<_, OngoingEvent>(
        "SELECT * FROM ongoing_events WHERE active = 1 \
         ORDER BY sort_order ASC, date_entered DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert_event(
    conn: &mut SqliteConnection,
    title: &str,
    description: &str,
    kind: Option<&str>,
    category: Option<&str>,
    sort_order: i64,
) -> Result<i64> {
    let id = next_content_id(conn).await?;
    sqlx::query(
        r#"
        INSERT INTO ongoing_events (id, title, description, active, type, category, sort_order)
        VALUES (?, ?, ?, 1, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(kind)
    .bind(category)
    .bind(sort_order)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

// ------------------------------------------------------------------
// Sermons (database-backed listing)
// ------------------------------------------------------------------

pub async fn list_sermons(pool: &SqlitePool) -> Result<Vec<SermonRow>> {
    let rows = sqlx::query_as::<_, SermonRow>("SELECT * FROM sermons ORDER BY date DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Insert or update a sermon row keyed on its date-derived id
pub async fn upsert_sermon(conn: &mut SqliteConnection, sermon: &SermonRow) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sermons
            (id, title, author, scripture, date, spotify_url, youtube_url,
             apple_podcasts_url, podcast_thumbnail_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            author = excluded.author,
            scripture = excluded.scripture,
            date = excluded.date,
            spotify_url = excluded.spotify_url,
            youtube_url = excluded.youtube_url,
            apple_podcasts_url = excluded.apple_podcasts_url,
            podcast_thumbnail_url = excluded.podcast_thumbnail_url
        "#,
    )
    .bind(&sermon.id)
    .bind(&sermon.title)
    .bind(&sermon.author)
    .bind(&sermon.scripture)
    .bind(sermon.date)
    .bind(&sermon.spotify_url)
    .bind(&sermon.youtube_url)
    .bind(&sermon.apple_podcasts_url)
    .bind(&sermon.podcast_thumbnail_url)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

// ------------------------------------------------------------------
// Podcasts
// ------------------------------------------------------------------

pub async fn find_series_by_title(
    pool: &SqlitePool,
    title: &str,
) -> Result<Option<PodcastSeries>> {
    let row = sqlx::query_as::<_, PodcastSeries>("SELECT * FROM podcast_series WHERE title = ?")
        .bind(title)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Look up a series by title, creating it if missing
pub async fn ensure_series(
    conn: &mut SqliteConnection,
    title: &str,
    description: Option<&str>,
) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM podcast_series WHERE title = ?")
        .bind(title)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = next_content_id(conn).await?;
    sqlx::query("INSERT INTO podcast_series (id, title, description) VALUES (?, ?, ?)")
        .bind(id)
        .bind(title)
        .bind(description)
        .execute(&mut *conn)
        .await?;
    Ok(id)
}

pub async fn list_episodes_for_series(
    pool: &SqlitePool,
    series_id: i64,
) -> Result<Vec<PodcastEpisode>> {
    let rows = sqlx::query_as::<_, PodcastEpisode>(
        "SELECT * FROM podcast_episodes WHERE series_id = ? \
         ORDER BY season DESC, number DESC, date_added DESC",
    )
    .bind(series_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fields for a new podcast episode
#[derive(Debug, Clone, Default)]
pub struct NewEpisode {
    pub series_id: i64,
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

pub async fn insert_episode(conn: &mut SqliteConnection, new: &NewEpisode) -> Result<i64> {
    let id = next_content_id(conn).await?;
    sqlx::query(
        r#"
        INSERT INTO podcast_episodes
            (id, series_id, number, title, link, listen_url, handout_url,
             guest, date_added, season, scripture, podcast_thumbnail_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(new.series_id)
    .bind(new.number)
    .bind(&new.title)
    .bind(&new.link)
    .bind(&new.listen_url)
    .bind(&new.handout_url)
    .bind(&new.guest)
    .bind(new.date_added)
    .bind(new.season)
    .bind(&new.scripture)
    .bind(&new.podcast_thumbnail_url)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn episode_exists(
    conn: &mut SqliteConnection,
    series_id: i64,
    title: &str,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM podcast_episodes WHERE series_id = ? AND title = ?",
    )
    .bind(series_id)
    .bind(title)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

// ------------------------------------------------------------------
// Gallery
// ------------------------------------------------------------------

/// Fields for a new gallery image
#[derive(Debug, Clone, Default)]
pub struct NewGalleryImage {
    pub name: Option<String>,
    pub url: String,
    pub size: Option<String>,
    pub kind: Option<String>,
    pub tags: Vec<String>,
    pub event: bool,
    pub created: Option<NaiveDateTime>,
}

pub async fn list_gallery_images(pool: &SqlitePool, event_only: bool) -> Result<Vec<GalleryImage>> {
    let sql = if event_only {
        "SELECT * FROM gallery_images WHERE event = 1 ORDER BY created DESC"
    } else {
        "SELECT * FROM gallery_images ORDER BY created DESC"
    };
    let rows = sqlx::query_as::<_, GalleryImage>(sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_gallery_image_by_url(
    conn: &mut SqliteConnection,
    url: &str,
) -> Result<Option<GalleryImage>> {
    let row = sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery_images WHERE url = ?")
        .bind(url)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn insert_gallery_image(
    conn: &mut SqliteConnection,
    new: &NewGalleryImage,
) -> Result<i64> {
    let id = next_content_id(conn).await?;
    let tags = serde_json::to_string(&new.tags)?;
    sqlx::query(
        r#"
        INSERT INTO gallery_images (id, name, url, size, type, tags, event, created)
        VALUES (?, ?, ?, ?, ?, ?, ?, COALESCE(?, CURRENT_TIMESTAMP))
        "#,
    )
    .bind(id)
    .bind(&new.name)
    .bind(&new.url)
    .bind(&new.size)
    .bind(&new.kind)
    .bind(tags)
    .bind(new.event)
    .bind(new.created)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}
