//! CLI command implementations

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use gitrat_core::{
    CoreError, MemoryStore, NodeKind, Snapshot, SnapshotStore, build_forest, dataset_path,
    read_dataset, resolve,
};
use gitrat_server::{GitratServer, ServerConfig};
use gitrat_watcher::WatcherService;

use crate::config::Config;

pub async fn serve(root: PathBuf, config: Config) -> anyhow::Result<()> {
    let cache_dir = config.cache_path(&root);
    tracing::info!("Cache directory: {}", cache_dir.display());

    let store = Arc::new(MemoryStore::new());
    if cache_dir.is_dir() {
        let loaded = store.load_dir(&cache_dir)?;
        tracing::info!("Loaded {} dataset(s)", loaded);

        // Start file watcher in background task
        let watcher_store = Arc::clone(&store);
        let watcher_dir = cache_dir.clone();
        tokio::spawn(async move {
            if let Err(e) = run_watcher(watcher_dir, watcher_store).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    } else {
        tracing::warn!("Cache directory {} does not exist", cache_dir.display());
    }
    if store.snapshot(&config.dataset).is_err() {
        tracing::warn!(
            "Dataset `{}` is not loaded; requests will fail until it appears",
            config.dataset
        );
    }

    let server = GitratServer::new(
        store,
        config.dataset.clone(),
        ServerConfig {
            host: config.host.clone(),
            port: config.port,
        },
    );
    let listener = server.bind().await?;

    if config.open {
        let url = format!("http://{}/api/list", listener.local_addr()?);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser at {}: {}", url, e);
        }
    }

    server.serve(listener).await
}

/// Run the dataset watcher until its channel closes
async fn run_watcher(dir: PathBuf, store: Arc<MemoryStore>) -> anyhow::Result<()> {
    let mut watcher = WatcherService::new(&dir, store)?;
    watcher.start_watching()?;
    watcher.process_events().await
}

/// What `check` found in one dataset.
#[derive(Debug, Default, PartialEq)]
struct CheckReport {
    groups: usize,
    subgroups: usize,
    leaf_items: usize,
    edges: usize,
    inert_edges: usize,
    roots: usize,
    /// Names shared by more than one node; `tree` cannot resolve them.
    ambiguous: BTreeSet<String>,
    /// Names whose subgraph is not a tree.
    malformed: BTreeSet<String>,
    /// Set when the containment edges loop.
    cycle: Option<String>,
}

impl CheckReport {
    fn is_clean(&self) -> bool {
        self.ambiguous.is_empty() && self.malformed.is_empty() && self.cycle.is_none()
    }
}

fn inspect(snapshot: &Snapshot) -> CheckReport {
    let mut report = CheckReport {
        edges: snapshot.edge_count(),
        inert_edges: snapshot.inert_edge_count(),
        ..CheckReport::default()
    };

    for node in snapshot.nodes() {
        match node.kind {
            NodeKind::Group => report.groups += 1,
            NodeKind::Subgroup => report.subgroups += 1,
            NodeKind::LeafItem => report.leaf_items += 1,
        }

        match resolve(snapshot, &node.name).and_then(|sub| sub.into_tree(&node.name)) {
            Ok(_) => {}
            Err(CoreError::AmbiguousName { .. }) => {
                report.ambiguous.insert(node.name.clone());
            }
            Err(CoreError::CycleDetected { node: id }) => {
                report.cycle.get_or_insert(id.to_string());
            }
            Err(e) => {
                tracing::debug!("{}", e);
                report.malformed.insert(node.name.clone());
            }
        }
    }

    match build_forest(snapshot) {
        Ok(forest) => report.roots = forest.len(),
        Err(CoreError::CycleDetected { node }) => {
            report.cycle.get_or_insert(node.to_string());
        }
        Err(e) => tracing::warn!("Failed to build hierarchy: {}", e),
    }
    report
}

pub fn check(root: &Path, config: &Config) -> anyhow::Result<()> {
    let path = dataset_path(&config.cache_path(root), &config.dataset);
    let snapshot = read_dataset(&path)
        .with_context(|| format!("Failed to load dataset `{}`", config.dataset))?;
    let report = inspect(&snapshot);

    println!("Dataset `{}` ({})", config.dataset, path.display());
    println!(
        "  {} groups, {} subgroups, {} projects",
        report.groups, report.subgroups, report.leaf_items
    );
    println!("  {} edges ({} inert)", report.edges, report.inert_edges);
    println!("  {} top-level entries", report.roots);

    for name in &report.ambiguous {
        tracing::warn!("Name `{}` is shared by several nodes", name);
    }
    for name in &report.malformed {
        tracing::warn!("Subgraph of `{}` is not a tree", name);
    }
    if let Some(node) = &report.cycle {
        tracing::warn!("Containment cycle through node {}", node);
    }

    if report.is_clean() {
        println!("  no anomalies");
    } else {
        println!(
            "  anomalies: {} ambiguous, {} malformed, cycle: {}",
            report.ambiguous.len(),
            report.malformed.len(),
            if report.cycle.is_some() { "yes" } else { "no" }
        );
    }
    Ok(())
}
