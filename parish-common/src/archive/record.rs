//! Sermon record model

use serde::{Deserialize, Serialize};

/// Provenance of a sermon record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SermonSource {
    #[default]
    Manual,
    Youtube,
    Archive,
}

/// Default series when an ingester cannot determine one
pub const DEFAULT_SERIES: &str = "The Sunday Sermon";

/// One sermon in the archive.
///
/// Field names and order match the persisted JSON document; downstream
/// consumers read this shape directly, so renames are breaking changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SermonRecord {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub scripture: String,
    /// ISO `YYYY-MM-DD`, or empty when the source carried no usable date
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub apple_podcasts_url: String,
    #[serde(default)]
    pub spotify_url: String,
    #[serde(default)]
    pub youtube_url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub podcast_thumbnail_url: String,
    #[serde(default)]
    pub source: SermonSource,
    #[serde(default = "default_series")]
    pub series: String,
    #[serde(default)]
    pub episode_title: String,
    #[serde(default = "default_sermon_type")]
    pub sermon_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub search_keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_absolute: Option<i64>,
}

fn default_series() -> String {
    DEFAULT_SERIES.to_string()
}

fn default_sermon_type() -> String {
    "sermon".to_string()
}

impl SermonRecord {
    /// Minimal record; ingesters fill the remaining fields
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: String::new(),
            title: title.clone(),
            author: String::new(),
            scripture: String::new(),
            date: date.into(),
            apple_podcasts_url: String::new(),
            spotify_url: String::new(),
            youtube_url: String::new(),
            link: String::new(),
            podcast_thumbnail_url: String::new(),
            source: SermonSource::Manual,
            series: default_series(),
            episode_title: title,
            sermon_type: default_sermon_type(),
            tags: Vec::new(),
            search_keywords: String::new(),
            episode_number: None,
            episode_absolute: None,
        }
    }

    /// Duplicate-detection key: (normalized lowercase title, ISO date).
    ///
    /// Deliberately string-equality based for compatibility with existing
    /// archives; all call sites go through here so the matching rule can be
    /// hardened in one place.
    pub fn dedup_key(&self) -> (String, String) {
        (self.title.trim().to_lowercase(), self.date.clone())
    }

    /// Lowercased space-joined search blob from title/author/scripture/series
    pub fn build_search_keywords(&mut self) {
        self.search_keywords = format!(
            "{} {} {} {}",
            self.title, self.author, self.scripture, self.series
        )
        .to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_normalizes_title() {
        let a = SermonRecord::new("  Grace  ", "2024-01-07");
        let b = SermonRecord::new("grace", "2024-01-07");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn source_serializes_lowercase() {
        let mut record = SermonRecord::new("Faith", "2023-03-05");
        record.source = SermonSource::Archive;
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source"], "archive");
    }

    #[test]
    fn deserializes_sparse_record() {
        let record: SermonRecord =
            serde_json::from_str(r#"{"title": "Hope", "date": "2024-01-07"}"#).unwrap();
        assert_eq!(record.series, DEFAULT_SERIES);
        assert_eq!(record.sermon_type, "sermon");
        assert_eq!(record.source, SermonSource::Manual);
        assert!(record.episode_number.is_none());
    }
}
