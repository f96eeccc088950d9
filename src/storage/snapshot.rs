// src/storage/snapshot.rs

//! Snapshot file store.
//!
//! A snapshot is the pretty-printed JSON of a `MaintenanceMap`, used as the
//! diff baseline for the next run. A missing snapshot is an empty prior
//! state, never an error, so the first run of a report simply sees
//! everything as added.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::MaintenanceMap;

/// Filesystem store for report snapshots, one file per report key.
///
/// A store instance owns its wiki's namespace directory for the duration
/// of one run; no file locking is done, so the scheduler must not overlap
/// runs of the same report.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root_dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `{data_dir}/{wiki_id}`.
    pub fn new(data_dir: impl Into<PathBuf>, wiki_id: &str) -> Self {
        Self {
            root_dir: data_dir.into().join(wiki_id),
        }
    }

    /// Get the snapshot path for a report key.
    fn path(&self, report_key: &str) -> PathBuf {
        self.root_dir.join(format!("{report_key}.json"))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Load the last persisted snapshot for a report key.
    ///
    /// Returns an empty map when no snapshot exists yet.
    pub async fn load<T: DeserializeOwned>(&self, report_key: &str) -> Result<MaintenanceMap<T>> {
        let path = self.path(report_key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No snapshot at {}, starting empty", path.display());
                Ok(MaintenanceMap::new())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Persist the full current map for a report key, replacing any prior
    /// content. Called unconditionally after every diff so later reordering
    /// noise does not reappear as a change.
    pub async fn save<T: Serialize>(
        &self,
        report_key: &str,
        map: &MaintenanceMap<T>,
    ) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(map)?;
        self.write_bytes(&self.path(report_key), &bytes).await
    }
}
