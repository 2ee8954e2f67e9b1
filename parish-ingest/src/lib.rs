//! parish-ingest library - external data source importers

pub mod seed;
pub mod sources;
