//! Errors produced while loading or traversing a snapshot

use std::path::PathBuf;

use crate::model::NodeId;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("no node matches `{key}`")]
    NodeNotFound { key: String },

    #[error("`{name}` matches {count} nodes, expected exactly one")]
    AmbiguousName { name: String, count: usize },

    #[error("unknown category selector `{selector}`")]
    UnknownCategory { selector: String },

    #[error("dataset `{dataset}` has not been loaded")]
    Unavailable { dataset: String },

    /// The resolved subgraph does not satisfy `nodes - 1 == edges`.
    #[error("subgraph around `{anchor}` is not a tree: {nodes} nodes, {edges} edges")]
    MalformedSubgraph {
        anchor: String,
        nodes: usize,
        edges: usize,
    },

    #[error("containment cycle through node {node}")]
    CycleDetected { node: NodeId },

    #[error("node id {id} appears more than once")]
    DuplicateNode { id: NodeId },

    #[error("node {id} has unsupported category `{category}`")]
    UnknownKind { id: NodeId, category: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
