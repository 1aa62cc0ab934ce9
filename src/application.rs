//! Application layer module
//!
//! Orchestrates the listing source, the parser and the dataset store.

pub mod catalog_sync;

pub use catalog_sync::{CatalogSync, SyncOptions, SyncOutcome, SyncSummary};
