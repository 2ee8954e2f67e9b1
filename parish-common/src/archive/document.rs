//! On-disk sermon archive document

use super::record::SermonRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Bucket key for records without a parseable date.
/// Sorts after all 4-digit years in a `BTreeMap`, so it renders last.
pub const NO_DATE_BUCKET: &str = "_no_date";

pub const DEFAULT_TITLE: &str = "Sunday Sermons";
pub const DEFAULT_DESCRIPTION: &str = "Weekly sermons from our Sunday worship services";
const ORGANIZED_BY: &str = "year (oldest to newest)";

/// Per-year summary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub count: usize,
    pub note: String,
}

impl YearCount {
    pub fn new(year: &str, count: usize) -> Self {
        Self {
            count,
            note: format!("{} sermons from {}", count, year),
        }
    }
}

/// The persisted archive structure.
///
/// Serialized field names and order are the wire format; the underscore
/// prefixes mark derived metadata. `sermons_by_year` holds each year's
/// records newest-first, while the flat `sermons` array concatenates years
/// oldest-first. The asymmetry is long-standing observable behavior of the
/// serving endpoints and must not be changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveDocument {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(rename = "_year_counts", default)]
    pub year_counts: BTreeMap<String, YearCount>,
    #[serde(rename = "_total_sermons", default)]
    pub total_sermons: usize,
    #[serde(rename = "_organized_by", default = "default_organized_by")]
    pub organized_by: String,
    #[serde(default)]
    pub sermons_by_year: BTreeMap<String, Vec<SermonRecord>>,
    /// Flat array kept for API compatibility
    #[serde(default)]
    pub sermons: Vec<SermonRecord>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_organized_by() -> String {
    ORGANIZED_BY.to_string()
}

impl Default for ArchiveDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl ArchiveDocument {
    /// Archive with zero records and default metadata
    pub fn empty() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            year_counts: BTreeMap::new(),
            total_sermons: 0,
            organized_by: default_organized_by(),
            sermons_by_year: BTreeMap::new(),
            sermons: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_sermons == 0 && self.sermons.is_empty() && self.sermons_by_year.is_empty()
    }

    /// Collect every record exactly once.
    ///
    /// Reads the year buckets first, then picks up any flat-array entries
    /// whose id is not already present. Older archives were written with
    /// one of the two views stripped, so neither alone is trusted.
    pub fn all_records(&self) -> Vec<SermonRecord> {
        let mut records = Vec::new();
        let mut seen_ids: HashSet<&str> = HashSet::new();

        for bucket in self.sermons_by_year.values() {
            for record in bucket {
                if seen_ids.insert(record.id.as_str()) {
                    records.push(record.clone());
                }
            }
        }
        for record in &self.sermons {
            if seen_ids.insert(record.id.as_str()) {
                records.push(record.clone());
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_date_bucket_sorts_last() {
        let mut map: BTreeMap<String, Vec<SermonRecord>> = BTreeMap::new();
        map.insert("2024".to_string(), Vec::new());
        map.insert(NO_DATE_BUCKET.to_string(), Vec::new());
        map.insert("1999".to_string(), Vec::new());

        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["1999", "2024", NO_DATE_BUCKET]);
    }

    #[test]
    fn empty_document_round_trips() {
        let doc = ArchiveDocument::empty();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"_organized_by\":\"year (oldest to newest)\""));
        let back: ArchiveDocument = serde_json::from_str(&json).unwrap();
        assert!(back.is_empty());
        assert_eq!(back.title, DEFAULT_TITLE);
    }

    #[test]
    fn all_records_merges_buckets_and_flat_array() {
        let mut doc = ArchiveDocument::empty();
        let mut bucketed = SermonRecord::new("Faith", "2023-03-05");
        bucketed.id = "23-03-05".to_string();
        doc.sermons_by_year
            .insert("2023".to_string(), vec![bucketed.clone()]);
        // Flat array repeats the bucketed record and adds one more
        let mut extra = SermonRecord::new("Hope", "2024-01-07");
        extra.id = "24-01-07".to_string();
        doc.sermons = vec![bucketed, extra];

        let records = doc.all_records();
        assert_eq!(records.len(), 2);
    }
}
