//! Test utilities for gitrat

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::model::{Edge, Node, NodeKind};
use crate::snapshot::Snapshot;

/// Group `G` (1) owns subgroup `S` (2), which owns project `P` (3).
pub fn scenario_snapshot() -> Snapshot {
    Snapshot::new(
        vec![
            Node::new("1", "G", NodeKind::Group),
            Node::new("2", "S", NodeKind::Subgroup),
            Node::new("3", "P", NodeKind::LeafItem),
        ],
        vec![Edge::owned_by("2", "1"), Edge::owned_by("3", "2")],
    )
    .unwrap()
}

/// Two groups, nested subgroups, a top-level project and a cross-link.
pub fn nested_snapshot() -> Snapshot {
    Snapshot::new(
        vec![
            Node::new("10", "platform", NodeKind::Group),
            Node::new("11", "infra", NodeKind::Subgroup),
            Node::new("12", "k8s", NodeKind::Subgroup),
            Node::new("13", "data", NodeKind::Subgroup),
            Node::new("20", "portal", NodeKind::LeafItem),
            Node::new("21", "helm-charts", NodeKind::LeafItem),
            Node::new("22", "terraform", NodeKind::LeafItem),
            Node::new("23", "etl", NodeKind::LeafItem),
            Node::new("30", "research", NodeKind::Group),
            Node::new("31", "notebooks", NodeKind::LeafItem),
            Node::new("40", "dotfiles", NodeKind::LeafItem),
        ],
        vec![
            Edge::owned_by("11", "10"),
            Edge::owned_by("20", "10"),
            Edge::owned_by("13", "10"),
            Edge::owned_by("12", "11"),
            Edge::owned_by("21", "12"),
            Edge::owned_by("22", "11"),
            Edge::owned_by("23", "13"),
            Edge::owned_by("31", "30"),
            Edge::owned_by("40", "alice"),
            Edge {
                from: "23".into(),
                to: "31".into(),
                label: Some("dependson".to_string().into()),
            },
        ],
    )
    .unwrap()
}

pub fn names<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

/// A dataset file in the shape the scraper writes.
pub const SCRAPED_DATASET: &str = r##"{
  "nodes": [
    { "id": 1, "name": "G", "color": "#97c2fc", "_data": { "type": "group", "name": "G", "url": "https://git.example.com/g" } },
    { "id": 2, "name": "S", "_data": { "type": "subgroup", "name": "S" } },
    { "id": "3", "name": "P", "_data": {
        "type": "code", "name": "P", "description": "payments",
        "langs": [{ "name": "Rust", "percent": 97.5 }],
        "add": [{ "file": "README.md", "message": "missing" }]
    } },
    { "id": 4, "name": "Q", "_data": { "type": "code", "name": "Q" } }
  ],
  "edges": [
    { "id": 2, "to": 1, "label": "ownedby" },
    { "from": "3", "to": "2", "label": "ownedby" },
    { "from": 4, "to": 99, "label": "ownedby" }
  ]
}"##;

/// Create a temporary cache directory holding the given dataset files.
pub fn create_cache_dir(datasets: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (file, content) in datasets {
        write_file(temp_dir.path(), file, content);
    }
    temp_dir
}

pub fn write_file(root: &Path, file: &str, content: &str) {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cache_dir() {
        let temp_dir = create_cache_dir(&[("gitrat.json", SCRAPED_DATASET)]);
        assert!(temp_dir.path().join("gitrat.json").exists());
    }
}
