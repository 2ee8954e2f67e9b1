//! JSON seed-file importer.
//!
//! Loads hand-curated JSON arrays (announcements, gallery images) into the
//! database. Imports are idempotent upserts: announcements match by title,
//! gallery images by URL. New rows draw their IDs from the content counter
//! inside the same transaction as the insert.

use chrono::{NaiveDate, NaiveDateTime};
use parish_common::db::queries::{
    self, NewAnnouncement, NewGalleryImage,
};
use parish_common::Result;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one seed import
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedAnnouncement {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date_entered: Option<String>,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    superfeatured: bool,
    #[serde(default)]
    featured_image: Option<String>,
    #[serde(default)]
    image_display_type: Option<String>,
    #[serde(default)]
    show_in_banner: bool,
}

#[derive(Debug, Deserialize)]
struct SeedGalleryImage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    event: bool,
    #[serde(default)]
    created: Option<String>,
}

/// Import announcements from a JSON array, matching existing rows by title
pub async fn import_announcements(pool: &SqlitePool, path: &Path) -> Result<ImportStats> {
    let raw = std::fs::read_to_string(path)?;
    let items: Vec<SeedAnnouncement> = serde_json::from_str(&raw)?;

    let mut stats = ImportStats::default();
    let mut tx = pool.begin().await?;

    for item in items {
        let title = item.title.trim().to_string();
        if title.is_empty() {
            warn!("Skipping announcement without title");
            stats.skipped += 1;
            continue;
        }

        let new = NewAnnouncement {
            title: title.clone(),
            description: item.description,
            date_entered: item.date_entered.as_deref().and_then(parse_timestamp),
            active: item.active,
            kind: item.kind,
            category: item.category,
            tag: item.tag,
            superfeatured: item.superfeatured,
            featured_image: item.featured_image,
            image_display_type: item.image_display_type,
            show_in_banner: item.show_in_banner,
        };

        match queries::find_announcement_by_title(&mut tx, &title).await? {
            Some(existing) => {
                queries::update_announcement(&mut tx, existing.id, &new).await?;
                stats.updated += 1;
                info!("Updated announcement #{}: {}", existing.id, title);
            }
            None => {
                let id = queries::insert_announcement(&mut tx, &new).await?;
                stats.added += 1;
                info!("Added announcement #{}: {}", id, title);
            }
        }
    }

    tx.commit().await?;
    Ok(stats)
}

/// Import gallery images from a JSON array, skipping URLs already present
pub async fn import_gallery(pool: &SqlitePool, path: &Path) -> Result<ImportStats> {
    let raw = std::fs::read_to_string(path)?;
    let items: Vec<SeedGalleryImage> = serde_json::from_str(&raw)?;

    let mut stats = ImportStats::default();
    let mut tx = pool.begin().await?;

    for item in items {
        if item.url.is_empty() {
            warn!("Skipping gallery image without url");
            stats.skipped += 1;
            continue;
        }

        if queries::find_gallery_image_by_url(&mut tx, &item.url).await?.is_some() {
            stats.skipped += 1;
            continue;
        }

        let created = item
            .created
            .as_deref()
            .filter(|c| *c != "Unknown")
            .and_then(parse_timestamp);

        let id = queries::insert_gallery_image(
            &mut tx,
            &NewGalleryImage {
                name: item.name.clone(),
                url: item.url,
                size: item.size,
                kind: item.kind,
                tags: item.tags,
                event: item.event,
                created,
            },
        )
        .await?;
        stats.added += 1;
        info!("Added gallery image #{}: {}", id, item.name.unwrap_or_default());
    }

    tx.commit().await?;
    Ok(stats)
}

/// Parse a seed-file timestamp: ISO datetime or bare date
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2024-01-07T09:30:00").is_some());
        assert!(parse_timestamp("2024-01-07 09:30:00").is_some());
        assert!(parse_timestamp("2024-01-07").is_some());
        assert!(parse_timestamp("Unknown").is_none());
    }
}
