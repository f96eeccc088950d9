// src/storage/mod.rs

//! Snapshot persistence for maintenance reports.
//!
//! Each report key owns one JSON file holding the last-known-good result
//! set, namespaced per wiki:
//!
//! ```text
//! {data_dir}/
//! └── {wiki_id}/
//!     ├── link-errors.json
//!     └── querypages.json
//! ```

pub mod snapshot;

pub use snapshot::SnapshotStore;
