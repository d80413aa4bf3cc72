//! Snapshot store: the query surface the resolver and builder consume

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;

use crate::dataset::read_dataset;
use crate::error::{CoreError, Result};
use crate::model::{Node, NodeId};
use crate::snapshot::Snapshot;

/// Cache directory: .gitrat/
pub const CACHE_DIR: &str = ".gitrat";

/// Dataset written by the scraper when no other name is configured.
pub const DEFAULT_DATASET: &str = "gitrat";

/// Path of the file holding `dataset` inside `dir`.
pub fn dataset_path(dir: &Path, dataset: &str) -> PathBuf {
    dir.join(format!("{dataset}.json"))
}

/// Dataset key for a cache file: its stem, if it is a `.json` file.
pub fn dataset_key(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Read access to named snapshots.
pub trait SnapshotStore: Send + Sync {
    /// The current snapshot of `dataset`, or [`CoreError::Unavailable`].
    fn snapshot(&self, dataset: &str) -> Result<Arc<Snapshot>>;

    fn find_node_by_name(&self, dataset: &str, name: &str) -> Result<Option<Node>> {
        Ok(self.snapshot(dataset)?.find_by_name(name).next().cloned())
    }

    fn find_node_by_id(&self, dataset: &str, id: &NodeId) -> Result<Option<Node>> {
        Ok(self.snapshot(dataset)?.node(id).cloned())
    }
}

/// In-memory store. Thread-safe for concurrent access; replacing a dataset
/// swaps its `Arc`, so readers keep the snapshot they started with.
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: DashMap<String, Arc<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            datasets: DashMap::new(),
        }
    }

    /// Insert or replace a dataset.
    pub fn insert(&self, dataset: impl Into<String>, snapshot: Snapshot) {
        self.datasets.insert(dataset.into(), Arc::new(snapshot));
    }

    /// Drop a dataset. Returns whether it was present.
    pub fn remove(&self, dataset: &str) -> bool {
        self.datasets.remove(dataset).is_some()
    }

    /// Names of all loaded datasets, sorted.
    pub fn datasets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Parse one dataset file and store it under `dataset`. On failure the
    /// previous snapshot, if any, stays in place.
    pub fn load_file(&self, dataset: &str, path: &Path) -> Result<()> {
        let snapshot = read_dataset(path)?;
        tracing::info!(
            "Dataset `{}` loaded: {} nodes, {} edges",
            dataset,
            snapshot.node_count(),
            snapshot.edge_count()
        );
        self.insert(dataset, snapshot);
        Ok(())
    }

    /// Load every `*.json` file in `dir`. Files that fail to parse are
    /// logged and skipped. Returns the number of datasets loaded.
    pub fn load_dir(&self, dir: &Path) -> Result<usize> {
        let entries = std::fs::read_dir(dir).map_err(|source| CoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            let Some(dataset) = dataset_key(&path) else {
                continue;
            };
            match self.load_file(&dataset, &path) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }
}

impl SnapshotStore for MemoryStore {
    fn snapshot(&self, dataset: &str) -> Result<Arc<Snapshot>> {
        self.datasets
            .get(dataset)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| CoreError::Unavailable {
                dataset: dataset.to_string(),
            })
    }
}
