//! File-backed archive document store.
//!
//! The store keeps an in-memory copy of the document guarded by a lock and
//! invalidates it on every write. Callers that mutate the file out of band
//! (the admin tools) call `invalidate()` explicitly; there is no mtime
//! polling.

use super::document::ArchiveDocument;
use super::record::SermonRecord;
use super::reorganize::{merge_and_reorganize, MergeOutcome};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{info, warn};

pub struct ArchiveStore {
    path: PathBuf,
    cached: RwLock<Option<ArchiveDocument>>,
}

impl ArchiveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, reading the file on first access.
    ///
    /// A missing file or malformed JSON yields an empty archive rather than
    /// an error; callers check `total_sermons` before assuming data exists.
    pub fn load(&self) -> Result<ArchiveDocument> {
        if let Some(doc) = self.cached.read().expect("archive cache poisoned").as_ref() {
            return Ok(doc.clone());
        }

        let doc = self.read_document();
        *self.cached.write().expect("archive cache poisoned") = Some(doc.clone());
        Ok(doc)
    }

    fn read_document(&self) -> ArchiveDocument {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return ArchiveDocument::empty();
            }
            Err(e) => {
                warn!("Failed to read archive {}: {}", self.path.display(), e);
                return ArchiveDocument::empty();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(
                    "Malformed archive JSON in {}; treating as empty: {}",
                    self.path.display(),
                    e
                );
                ArchiveDocument::empty()
            }
        }
    }

    /// Persist the document and refresh the cache
    pub fn save(&self, document: &ArchiveDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, json)?;
        *self.cached.write().expect("archive cache poisoned") = Some(document.clone());
        Ok(())
    }

    /// Drop the cached copy; the next `load` re-reads the file
    pub fn invalidate(&self) {
        *self.cached.write().expect("archive cache poisoned") = None;
    }

    /// Merge incoming records into the stored archive and persist the
    /// rebuilt document. Safe to re-run with the same input: already-merged
    /// records are reported as skipped and the output is unchanged.
    pub fn merge_incoming(&self, incoming: Vec<SermonRecord>) -> Result<MergeOutcome> {
        let current = self.load()?;
        let mut outcome = merge_and_reorganize(current.all_records(), incoming);

        // Title and description are curated fields, not derived ones
        outcome.document.title = current.title;
        outcome.document.description = current.description;

        self.save(&outcome.document)?;
        info!(
            "Archive updated: {} added, {} skipped, {} total",
            outcome.added,
            outcome.skipped.len(),
            outcome.document.total_sermons
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ArchiveStore {
        ArchiveStore::new(dir.path().join("sermons.json"))
    }

    #[test]
    fn missing_file_loads_as_empty_archive() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let doc = store.load().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn malformed_json_loads_as_empty_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sermons.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = ArchiveStore::new(path);
        let doc = store.load().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn merge_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let outcome = store
            .merge_incoming(vec![
                SermonRecord::new("Faith", "2023-03-05"),
                SermonRecord::new("Hope", "2024-01-07"),
            ])
            .unwrap();
        assert_eq!(outcome.added, 2);

        store.invalidate();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.total_sermons, 2);
        assert_eq!(reloaded.sermons[0].title, "Faith");
    }

    #[test]
    fn remerging_same_records_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .merge_incoming(vec![SermonRecord::new("Faith", "2023-03-05")])
            .unwrap();
        let first = std::fs::read_to_string(store.path()).unwrap();

        let outcome = store
            .merge_incoming(vec![SermonRecord::new("Faith", "2023-03-05")])
            .unwrap();
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.skipped.len(), 1);

        let second = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
    }
}
