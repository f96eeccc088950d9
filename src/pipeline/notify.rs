// src/pipeline/notify.rs

//! Diff rendering and batch packing.
//!
//! Converts a categorized diff into size- and count-bounded embed batches.
//! Rendering and packing are pure; delivery lives in
//! [`crate::services::webhook`].

use crate::models::CategorizedDiff;
use crate::services::{Embed, EmbedBatch};

/// Embed color for newly appeared items.
pub const COLOR_ADDED: u32 = 0xFF0000;
/// Embed color for resolved items.
pub const COLOR_REMOVED: u32 = 0x00FF00;

/// Maximum characters in an embed title.
const TITLE_LIMIT: usize = 256;
/// Character budget for an embed body.
const BODY_LIMIT: usize = 4000;
/// Maximum embeds per webhook post.
const BATCH_EMBED_LIMIT: usize = 10;
/// Maximum accumulated characters per webhook post.
const BATCH_CHAR_LIMIT: usize = 6000;
/// Line standing in for items cut by the body budget.
const TRUNCATION_MARKER: &str = "- …";

/// How one report kind titles and formats its diff for the channel.
pub trait DiffFormat<T> {
    /// Title for a category's newly appeared items.
    fn added_title(&self, category: &str) -> String;
    /// Title for a category's resolved items.
    fn removed_title(&self, category: &str) -> String;
    /// One body line per item.
    fn format_item(&self, item: &T) -> String;
}

/// Render a diff into embeds: per category, one for `added` and one for
/// `removed`, each only when non-empty. Category order follows the diff
/// map, so added/removed pairs stay adjacent.
pub fn render_embeds<T, F: DiffFormat<T>>(diff: &CategorizedDiff<T>, format: &F) -> Vec<Embed> {
    let mut embeds = Vec::new();
    for (category, changes) in diff {
        if !changes.added.is_empty() {
            embeds.push(Embed {
                title: truncate_title(&format.added_title(category)),
                color: COLOR_ADDED,
                description: truncate_list(&changes.added, |item| format.format_item(item)),
            });
        }
        if !changes.removed.is_empty() {
            embeds.push(Embed {
                title: truncate_title(&format.removed_title(category)),
                color: COLOR_REMOVED,
                description: truncate_list(&changes.removed, |item| format.format_item(item)),
            });
        }
    }
    embeds
}

fn truncate_title(title: &str) -> String {
    title.chars().take(TITLE_LIMIT).collect()
}

/// Format items into a newline-joined body, truncating the *list* once the
/// running character budget would be exceeded. Truncation replaces the
/// remaining items with a single marker line; room for the marker is
/// reserved up front so the final body never exceeds the budget.
fn truncate_list<T>(items: &[T], format_item: impl Fn(&T) -> String) -> String {
    let reserve = TRUNCATION_MARKER.chars().count() + 1;
    let mut picked = Vec::new();
    let mut length = 0usize;

    for item in items {
        let line = format_item(item);
        let line_length = line.chars().count();
        if length + line_length + 1 > BODY_LIMIT - reserve {
            picked.push(TRUNCATION_MARKER.to_string());
            break;
        }
        length += line_length + 1;
        picked.push(line);
    }
    picked.join("\n")
}

/// Pack embeds into delivery batches as a pure fold.
///
/// An embed starts a new batch when appending it would push the current
/// batch past the embed-count ceiling or the character ceiling. Batch
/// order equals embed order.
pub fn pack_batches(embeds: Vec<Embed>) -> Vec<EmbedBatch> {
    let mut batches: Vec<EmbedBatch> = Vec::new();
    let mut batch: EmbedBatch = Vec::new();
    let mut batch_chars = 0usize;

    for embed in embeds {
        let chars = embed.char_count();
        if !batch.is_empty()
            && (batch.len() >= BATCH_EMBED_LIMIT || batch_chars + chars > BATCH_CHAR_LIMIT)
        {
            batches.push(std::mem::take(&mut batch));
            batch_chars = 0;
        }
        batch_chars += chars;
        batch.push(embed);
    }
    if !batch.is_empty() {
        batches.push(batch);
    }
    batches
}
