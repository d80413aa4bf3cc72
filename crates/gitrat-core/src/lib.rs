//! gitrat core: organization graph snapshots and the hierarchy views built on them

pub mod model;
pub mod error;
pub mod snapshot;
pub mod classify;
pub mod resolver;
pub mod hierarchy;
pub mod catalog;
pub mod dataset;
pub mod store;


#[cfg(test)]
pub mod test_utils;

pub use model::{Attributes, Edge, EdgeLabel, Node, NodeId, NodeKind};
pub use error::{CoreError, Result};
pub use snapshot::Snapshot;
pub use resolver::{Subgraph, resolve};
pub use hierarchy::{HierarchyItem, PresentationTree, build_forest};
pub use catalog::{CatalogEntry, catalog};
pub use dataset::{parse_dataset, read_dataset};
pub use store::{CACHE_DIR, DEFAULT_DATASET, MemoryStore, SnapshotStore, dataset_key, dataset_path};
