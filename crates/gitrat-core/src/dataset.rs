//! Dataset files as written by the scraper
//!
//! A dataset is a JSON object with `nodes` and `edges`. Each node carries
//! its category inside the `_data` bag; the category is lifted into
//! [`NodeKind`] here, once, and the rest of the bag is kept as opaque
//! attributes.

use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::model::{Attributes, Edge, Node, NodeId, NodeKind};
use crate::snapshot::Snapshot;

#[derive(Debug, Deserialize)]
struct CachedDataset {
    #[serde(default)]
    nodes: Vec<CachedNode>,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct CachedNode {
    id: NodeId,
    name: String,
    #[serde(default)]
    color: Option<serde_json::Value>,
    #[serde(rename = "_data", default)]
    data: Attributes,
}

impl TryFrom<CachedNode> for Node {
    type Error = CoreError;

    fn try_from(cached: CachedNode) -> Result<Self> {
        let CachedNode {
            id,
            name,
            color,
            mut data,
        } = cached;

        let category = match data.remove("type") {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let kind = NodeKind::from_category(&category)
            .ok_or_else(|| CoreError::UnknownKind {
                id: id.clone(),
                category,
            })?;

        Ok(Node {
            id,
            name,
            kind,
            color,
            attributes: data,
        })
    }
}

/// Parse a dataset from its JSON text.
pub fn parse_dataset(json: &str) -> Result<Snapshot> {
    let dataset: CachedDataset = serde_json::from_str(json)?;
    let nodes = dataset
        .nodes
        .into_iter()
        .map(Node::try_from)
        .collect::<Result<Vec<_>>>()?;
    Snapshot::new(nodes, dataset.edges)
}

/// Read and parse a dataset file.
pub fn read_dataset(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_dataset(&json)?;
    tracing::debug!(
        "Loaded {}: {} nodes, {} edges",
        path.display(),
        snapshot.node_count(),
        snapshot.edge_count()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeLabel;
    use crate::test_utils::SCRAPED_DATASET;

    #[test]
    fn test_parse_scraped_dataset() {
        let snapshot = parse_dataset(SCRAPED_DATASET).unwrap();
        assert_eq!(snapshot.node_count(), 4);
        assert_eq!(snapshot.edge_count(), 3);
        assert_eq!(snapshot.inert_edge_count(), 1);

        let g = snapshot.node(&"1".into()).unwrap();
        assert_eq!(g.kind, NodeKind::Group);
        assert_eq!(g.color, Some(serde_json::json!("#97c2fc")));
        assert!(!g.attributes.contains_key("type"));
        assert_eq!(g.attributes["url"], "https://git.example.com/g");

        let p = snapshot.node(&"3".into()).unwrap();
        assert_eq!(p.kind, NodeKind::LeafItem);
        assert_eq!(p.attributes["langs"][0]["name"], "Rust");
    }

    #[test]
    fn test_edge_id_alias() {
        let snapshot = parse_dataset(SCRAPED_DATASET).unwrap();
        let first = snapshot.edges().next().unwrap();
        assert_eq!(first.from.as_str(), "2");
        assert_eq!(first.to.as_str(), "1");
        assert_eq!(first.label, Some(EdgeLabel::OwnedBy));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{ "nodes": [{ "id": 1, "name": "x", "_data": { "type": "flow" } }], "edges": [] }"#;
        let err = parse_dataset(json).unwrap_err();
        assert!(matches!(err, CoreError::UnknownKind { ref category, .. } if category == "flow"));
    }

    #[test]
    fn test_missing_category_rejected() {
        let json = r#"{ "nodes": [{ "id": 1, "name": "x" }], "edges": [] }"#;
        assert!(matches!(
            parse_dataset(json),
            Err(CoreError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{ "nodes": [
            { "id": 1, "name": "a", "_data": { "type": "group" } },
            { "id": "1", "name": "b", "_data": { "type": "code" } }
        ], "edges": [] }"#;
        assert!(matches!(
            parse_dataset(json),
            Err(CoreError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_dataset(Path::new("/nonexistent/gitrat.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
