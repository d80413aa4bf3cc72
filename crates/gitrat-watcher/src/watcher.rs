//! Filesystem watcher implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use gitrat_core::{MemoryStore, dataset_key};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the dataset watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Dataset file created or rewritten
    Changed(PathBuf),
    /// Dataset file removed
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Changed(path) | WatchEvent::Removed(path) => path,
        }
    }
}

/// Watches one cache directory for `*.json` dataset files
pub struct DatasetWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
    dir: PathBuf,
}

impl DatasetWatcher {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                debug!("File system event: {:?}", event);
                for watch_event in to_watch_events(event) {
                    if let Err(e) = event_tx.send(watch_event) {
                        warn!("Failed to send watch event: {}", e);
                    }
                }
            }
            Err(e) => error!("File system watch error: {}", e),
        })?;

        Ok(Self {
            watcher,
            event_rx,
            dir,
        })
    }

    /// Start watching the cache directory. Subdirectories are ignored.
    pub fn watch(&mut self) -> Result<()> {
        info!("Watching dataset directory: {:?}", self.dir);
        self.watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn event_receiver(&mut self) -> &mut mpsc::UnboundedReceiver<WatchEvent> {
        &mut self.event_rx
    }
}

/// Convert a notify event into dataset events. Paths that are not
/// `*.json` files are dropped.
fn to_watch_events(event: notify::Event) -> Vec<WatchEvent> {
    use notify::EventKind;

    let make: fn(PathBuf) -> WatchEvent = match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => WatchEvent::Changed,
        EventKind::Remove(_) => WatchEvent::Removed,
        _ => return Vec::new(),
    };
    event
        .paths
        .into_iter()
        .filter(|path| dataset_key(path).is_some())
        .map(make)
        .collect()
}

/// Apply one event to the store. A file that no longer exists counts as
/// removed, which covers renames away from the watched name. A file that
/// fails to parse leaves the previous snapshot in place.
///
/// Returns whether the store changed.
pub fn apply_event(store: &MemoryStore, event: &WatchEvent) -> bool {
    let path = event.path();
    let Some(dataset) = dataset_key(path) else {
        return false;
    };

    match event {
        WatchEvent::Changed(path) if path.exists() => match store.load_file(&dataset, path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Keeping previous `{}` snapshot: {}", dataset, e);
                false
            }
        },
        _ => {
            let removed = store.remove(&dataset);
            if removed {
                info!("Dataset `{}` evicted", dataset);
            }
            removed
        }
    }
}

/// Watcher service that keeps a store in sync with its cache directory
pub struct WatcherService {
    watcher: DatasetWatcher,
    store: Arc<MemoryStore>,
}

impl WatcherService {
    pub fn new(dir: impl AsRef<Path>, store: Arc<MemoryStore>) -> Result<Self> {
        Ok(Self {
            watcher: DatasetWatcher::new(dir)?,
            store,
        })
    }

    pub fn start_watching(&mut self) -> Result<()> {
        self.watcher.watch()?;
        info!("Started watching cache directory: {:?}", self.watcher.dir());
        Ok(())
    }

    /// Process file system events until the watcher shuts down
    pub async fn process_events(&mut self) -> Result<()> {
        while let Some(event) = self.watcher.event_receiver().recv().await {
            debug!("Processing watch event: {:?}", event);
            apply_event(&self.store, &event);
        }
        Ok(())
    }
}
