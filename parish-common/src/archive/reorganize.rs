//! Merge and year-partition the sermon archive.
//!
//! The transform is pure and synchronous: callers snapshot the full record
//! set, merge any newly ingested records into it, and persist the rebuilt
//! document under whatever isolation the store provides.

use super::document::{ArchiveDocument, YearCount, NO_DATE_BUCKET};
use super::record::SermonRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Result of merging incoming records into the archive
#[derive(Debug)]
pub struct MergeOutcome {
    /// Rebuilt archive document
    pub document: ArchiveDocument,
    /// Number of incoming records accepted
    pub added: usize,
    /// Incoming records rejected as duplicates of existing ones
    pub skipped: Vec<SermonRecord>,
}

/// Merge `incoming` into `existing` and rebuild the year-partitioned view.
///
/// Duplicate detection is by (normalized title, date); the existing record
/// always wins and the incoming one is reported in `skipped`. Records are
/// never dropped for a malformed date; they land in the `_no_date` bucket
/// and are excluded only from `_year_counts`.
pub fn merge_and_reorganize(
    existing: Vec<SermonRecord>,
    incoming: Vec<SermonRecord>,
) -> MergeOutcome {
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut seen_keys: HashSet<(String, String)> = HashSet::new();
    let mut merged: Vec<SermonRecord> = Vec::with_capacity(existing.len() + incoming.len());

    // Existing records keep their curated ids; only empty or clashing ids
    // are reassigned, so the unique-id invariant holds for the whole set.
    for mut record in existing {
        ensure_unique_id(&mut record, &mut used_ids);
        seen_keys.insert(record.dedup_key());
        merged.push(record);
    }

    let mut added = 0;
    let mut skipped = Vec::new();
    for mut record in incoming {
        let key = record.dedup_key();
        if seen_keys.contains(&key) {
            debug!("Skipping duplicate sermon: {:?} ({})", record.title, record.date);
            skipped.push(record);
            continue;
        }
        ensure_unique_id(&mut record, &mut used_ids);
        seen_keys.insert(key);
        merged.push(record);
        added += 1;
    }

    MergeOutcome {
        document: reorganize(merged),
        added,
        skipped,
    }
}

/// Rebuild the year buckets, flat array, and summary counts from a full
/// record set. The set is taken as already deduplicated.
pub fn reorganize(records: Vec<SermonRecord>) -> ArchiveDocument {
    let total = records.len();
    let mut buckets: BTreeMap<String, Vec<SermonRecord>> = BTreeMap::new();

    for record in records {
        let bucket = match iso_year(&record.date) {
            Some(year) => year,
            None => {
                if !record.date.is_empty() {
                    warn!(
                        "Sermon {:?} has unparseable date {:?}; filed without a year",
                        record.title, record.date
                    );
                }
                NO_DATE_BUCKET.to_string()
            }
        };
        buckets.entry(bucket).or_default().push(record);
    }

    // Newest first within each year; the no-date bucket keeps merge order
    for (year, bucket) in buckets.iter_mut() {
        if year != NO_DATE_BUCKET {
            bucket.sort_by(|a, b| b.date.cmp(&a.date));
        }
    }

    let mut year_counts = BTreeMap::new();
    for (year, bucket) in &buckets {
        if year != NO_DATE_BUCKET {
            year_counts.insert(year.clone(), YearCount::new(year, bucket.len()));
        }
    }

    // Flat array concatenates years oldest-first with _no_date appended last,
    // the reverse of the in-bucket ordering. Serving code depends on both
    // orderings; keep them as-is.
    let mut flat = Vec::with_capacity(total);
    for bucket in buckets.values() {
        flat.extend(bucket.iter().cloned());
    }

    let mut document = ArchiveDocument::empty();
    document.year_counts = year_counts;
    document.total_sermons = total;
    document.sermons_by_year = buckets;
    document.sermons = flat;
    document
}

/// 4-digit year of a valid ISO date, or None.
///
/// The date must parse as a real calendar date, and the bucket name is the
/// year the parser produced. A string whose leading characters disagree
/// with that year (non-zero-padded oddities) is treated as unparseable
/// rather than bucketed under a garbage key.
fn iso_year(date: &str) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let year = format!("{:04}", parsed.year());
    date.starts_with(&year).then_some(year)
}

/// Assign or repair the record id so it is unique within `used_ids`.
///
/// Dated records get `YY-MM-DD`, suffixed `-1`, `-2`, … on collision.
/// Undated records fall back to sequential `archive-NNNN`; this loses the
/// date-sortable property and is logged as a degraded path.
fn ensure_unique_id(record: &mut SermonRecord, used_ids: &mut HashSet<String>) {
    if !record.id.is_empty() && !used_ids.contains(&record.id) {
        used_ids.insert(record.id.clone());
        return;
    }

    let id = match NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") {
        Ok(date) => {
            let base = date.format("%y-%m-%d").to_string();
            if used_ids.contains(&base) {
                let mut suffix = 1;
                while used_ids.contains(&format!("{}-{}", base, suffix)) {
                    suffix += 1;
                }
                format!("{}-{}", base, suffix)
            } else {
                base
            }
        }
        Err(_) => {
            warn!(
                "Sermon {:?} has no usable date; assigning sequential archive id",
                record.title
            );
            let mut index = 0;
            loop {
                let candidate = format!("archive-{:04}", index);
                if !used_ids.contains(&candidate) {
                    break candidate;
                }
                index += 1;
            }
        }
    };

    used_ids.insert(id.clone());
    record.id = id;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::record::SermonRecord;

    fn record(title: &str, date: &str) -> SermonRecord {
        SermonRecord::new(title, date)
    }

    #[test]
    fn total_matches_input_size() {
        let set = vec![
            record("Faith", "2023-03-05"),
            record("Hope", "2024-01-07"),
            record("Love", ""),
        ];
        let outcome = merge_and_reorganize(set, vec![]);
        assert_eq!(outcome.document.total_sermons, 3);
    }

    #[test]
    fn reorganize_is_idempotent() {
        let set = vec![
            record("Faith", "2023-03-05"),
            record("Hope", "2024-01-07"),
            record("Undated", ""),
        ];
        let first = merge_and_reorganize(set, vec![]).document;
        let second = merge_and_reorganize(first.all_records(), vec![]).document;
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn each_dated_record_lands_in_exactly_one_matching_bucket() {
        let set = vec![
            record("A", "2023-03-05"),
            record("B", "2023-11-12"),
            record("C", "2024-01-07"),
        ];
        let doc = merge_and_reorganize(set, vec![]).document;

        for (year, bucket) in &doc.sermons_by_year {
            for r in bucket {
                assert!(r.date.starts_with(year.as_str()));
            }
        }
        // Exactly once in the flat array
        for id in doc.sermons_by_year.values().flatten().map(|r| &r.id) {
            assert_eq!(doc.sermons.iter().filter(|r| &r.id == id).count(), 1);
        }
        assert_eq!(doc.sermons.len(), 3);
    }

    #[test]
    fn merged_ids_are_unique() {
        let existing = vec![record("A", "2024-01-07"), record("B", "2024-01-07")];
        let incoming = vec![record("C", "2024-01-07"), record("D", "")];
        let doc = merge_and_reorganize(existing, incoming).document;

        let mut ids: Vec<String> = doc.sermons.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), doc.sermons.len());
    }

    #[test]
    fn duplicate_incoming_record_is_skipped() {
        let existing = vec![record("Grace", "2024-01-07")];
        let incoming = vec![record("  GRACE ", "2024-01-07")];
        let outcome = merge_and_reorganize(existing, incoming);

        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.document.total_sermons, 1);
    }

    #[test]
    fn same_date_collision_gets_numeric_suffix() {
        let incoming = vec![record("First", "2024-01-07"), record("Second", "2024-01-07")];
        let doc = merge_and_reorganize(vec![], incoming).document;

        let ids: Vec<&str> = doc.sermons.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&"24-01-07"));
        assert!(ids.contains(&"24-01-07-1"));
    }

    #[test]
    fn undated_records_use_sequential_archive_ids() {
        let incoming = vec![record("One", ""), record("Two", "")];
        let doc = merge_and_reorganize(vec![], incoming).document;

        let bucket = &doc.sermons_by_year[NO_DATE_BUCKET];
        assert_eq!(bucket[0].id, "archive-0000");
        assert_eq!(bucket[1].id, "archive-0001");
    }

    #[test]
    fn malformed_date_is_retained_in_no_date_bucket() {
        let incoming = vec![record("Bad", "2024-13-45"), record("Good", "2024-01-07")];
        let doc = merge_and_reorganize(vec![], incoming).document;

        assert_eq!(doc.total_sermons, 2);
        assert_eq!(doc.sermons_by_year[NO_DATE_BUCKET].len(), 1);
        assert!(!doc.year_counts.contains_key(NO_DATE_BUCKET));
        assert_eq!(doc.year_counts["2024"].count, 1);
    }

    #[test]
    fn end_to_end_example() {
        let incoming = vec![record("Faith", "2023-03-05"), record("Hope", "2024-01-07")];
        let doc = merge_and_reorganize(vec![], incoming).document;

        assert_eq!(doc.total_sermons, 2);
        assert_eq!(doc.year_counts["2023"].count, 1);
        assert_eq!(doc.year_counts["2023"].note, "1 sermons from 2023");
        assert_eq!(doc.year_counts["2024"].count, 1);

        // Flat array is oldest-year-first
        assert_eq!(doc.sermons[0].title, "Faith");
        assert_eq!(doc.sermons[1].title, "Hope");

        assert_eq!(doc.sermons_by_year["2023"][0].title, "Faith");
        assert_eq!(doc.sermons_by_year["2024"][0].title, "Hope");
    }

    #[test]
    fn in_bucket_order_is_newest_first() {
        let incoming = vec![
            record("Early", "2024-01-07"),
            record("Late", "2024-11-24"),
            record("Middle", "2024-06-02"),
        ];
        let doc = merge_and_reorganize(vec![], incoming).document;

        let titles: Vec<&str> = doc.sermons_by_year["2024"]
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["Late", "Middle", "Early"]);
    }

    #[test]
    fn curated_existing_ids_survive_merge() {
        let mut curated = record("Faith", "2023-03-05");
        curated.id = "legacy-faith".to_string();
        let doc = merge_and_reorganize(vec![curated], vec![record("Hope", "2024-01-07")]).document;

        assert!(doc.sermons.iter().any(|r| r.id == "legacy-faith"));
    }
}
