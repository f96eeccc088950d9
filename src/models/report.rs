// src/models/report.rs

//! Core report data structures.
//!
//! A maintenance report is a mapping from category name to a list of items:
//! query-page names to page titles, HTTP status classes to broken links.
//! The same shape is used in memory and on disk, so a snapshot file is just
//! the pretty-printed JSON of a `MaintenanceMap`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from category name to an unordered list of report items.
///
/// Items within one category are unique under the report's item equality
/// (plain value equality for titles, link-keyed equality for link errors).
/// A `BTreeMap` keeps snapshot key order stable across runs for diffability.
pub type MaintenanceMap<T> = BTreeMap<String, Vec<T>>;

/// Added/removed item lists for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diff<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> Diff<T> {
    /// Check whether both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Per-category diff between two maintenance maps.
///
/// A category is present only if at least one of its `added`/`removed`
/// lists is non-empty, so an empty map means a zero-delta run.
pub type CategorizedDiff<T> = BTreeMap<String, Diff<T>>;
