// src/pipeline/diff.rs

//! Categorized diff calculation.
//!
//! Computes the per-category difference between the previous snapshot and
//! the freshly fetched result set. The diff is what gets rendered into the
//! notification channel; identical category contents produce no output at
//! all, so a re-run against an unchanged wiki is silent.

use std::collections::{BTreeSet, HashSet};

use crate::models::{CategorizedDiff, Diff, MaintenanceMap};

/// Compare two maintenance maps under a caller-supplied item equality.
///
/// For every category present in either map, an item of `current` is
/// `added` when no equal item exists in `previous`, and vice versa for
/// `removed`. Each side keeps its original relative order. Categories with
/// no changes are omitted entirely.
///
/// Equality is O(|previous| · |current|) per category; category sizes are
/// small enough (tens to low hundreds) that this beats hashing for
/// arbitrary predicates. Use [`compare_string_maps`] for the exact-value
/// case.
pub fn compare_maps<T, F>(
    previous: &MaintenanceMap<T>,
    current: &MaintenanceMap<T>,
    equals: F,
) -> CategorizedDiff<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let mut diff = CategorizedDiff::new();
    let all_keys: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();

    for key in all_keys {
        let previous_items = previous.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let current_items = current.get(key).map(Vec::as_slice).unwrap_or(&[]);

        let added: Vec<T> = current_items
            .iter()
            .filter(|c| !previous_items.iter().any(|p| equals(p, c)))
            .cloned()
            .collect();
        let removed: Vec<T> = previous_items
            .iter()
            .filter(|p| !current_items.iter().any(|c| equals(p, c)))
            .cloned()
            .collect();

        let changes = Diff { added, removed };
        if !changes.is_empty() {
            diff.insert(key.clone(), changes);
        }
    }
    diff
}

/// Compare two string maps by exact value equality.
///
/// Hash-based fast path over [`compare_maps`] with `==`; the output is
/// identical, including relative order within `added`/`removed`.
pub fn compare_string_maps(
    previous: &MaintenanceMap<String>,
    current: &MaintenanceMap<String>,
) -> CategorizedDiff<String> {
    let mut diff = CategorizedDiff::new();
    let all_keys: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();

    for key in all_keys {
        let previous_items = previous.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let current_items = current.get(key).map(Vec::as_slice).unwrap_or(&[]);

        let previous_set: HashSet<&str> = previous_items.iter().map(String::as_str).collect();
        let current_set: HashSet<&str> = current_items.iter().map(String::as_str).collect();

        let added: Vec<String> = current_items
            .iter()
            .filter(|c| !previous_set.contains(c.as_str()))
            .cloned()
            .collect();
        let removed: Vec<String> = previous_items
            .iter()
            .filter(|p| !current_set.contains(p.as_str()))
            .cloned()
            .collect();

        let changes = Diff { added, removed };
        if !changes.is_empty() {
            diff.insert(key.clone(), changes);
        }
    }
    diff
}

/// Total number of changed items across all categories.
pub fn change_count<T>(diff: &CategorizedDiff<T>) -> usize {
    diff.values()
        .map(|d| d.added.len() + d.removed.len())
        .sum()
}
