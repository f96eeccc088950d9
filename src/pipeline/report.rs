// src/pipeline/report.rs

//! Generic report run: fetch, diff, persist, notify.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{CategorizedDiff, MaintenanceMap};
use crate::services::WebhookClient;
use crate::storage::SnapshotStore;

use super::diff::change_count;
use super::notify::{DiffFormat, pack_batches, render_embeds};

/// Source of one maintenance report's current result set.
#[async_trait]
pub trait ReportProducer {
    type Item: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Identifier under which this report's snapshot is stored and diffed.
    fn report_key(&self) -> &str;

    /// Diff two runs of this report. The differ decides what counts as
    /// the same logical item across runs.
    fn diff(
        &self,
        previous: &MaintenanceMap<Self::Item>,
        current: &MaintenanceMap<Self::Item>,
    ) -> CategorizedDiff<Self::Item>;

    /// Fetch the complete current result set. Must not return partial
    /// data; the diff below assumes the fetch finished.
    async fn produce(&self) -> Result<MaintenanceMap<Self::Item>>;
}

/// Run one report end to end.
///
/// The snapshot is advanced unconditionally, even for a zero-delta run, so
/// ordering noise in the producer's output never reappears as a diff. If
/// the process dies before the save, the next run re-diffs against the same
/// baseline, which is safe.
pub async fn run_report<P, F>(
    producer: &P,
    format: &F,
    store: &SnapshotStore,
    webhook: &WebhookClient,
) -> Result<()>
where
    P: ReportProducer + Sync,
    F: DiffFormat<P::Item> + Sync,
{
    let key = producer.report_key();
    let started = Utc::now();

    let current = producer.produce().await?;
    let previous = store.load::<P::Item>(key).await?;
    let diff = producer.diff(&previous, &current);
    store.save(key, &current).await?;

    let elapsed = (Utc::now() - started).num_seconds();
    if diff.is_empty() {
        log::info!(
            "{key}: no changes across {} categories ({elapsed}s)",
            current.len()
        );
        return Ok(());
    }

    log::info!(
        "{key}: {} changes across {} categories ({elapsed}s)",
        change_count(&diff),
        diff.len()
    );

    let batches = pack_batches(render_embeds(&diff, format));
    webhook.deliver(batches).await
}
