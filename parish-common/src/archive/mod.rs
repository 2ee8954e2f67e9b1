//! Sermon archive: record model, year-partitioned reorganizer, document store

pub mod document;
pub mod record;
pub mod reorganize;
pub mod store;

pub use document::{ArchiveDocument, YearCount, NO_DATE_BUCKET};
pub use record::{SermonRecord, SermonSource};
pub use reorganize::{merge_and_reorganize, MergeOutcome};
pub use store::ArchiveStore;
