//! Catalog and per-category lookups

use serde::{Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::model::{Node, NodeId, NodeKind};
use crate::snapshot::Snapshot;

/// Short listing entry for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry<'a> {
    pub id: &'a NodeId,
    pub name: &'a str,
    /// Written as the catalog category: `group`, `subgroup` or `project`.
    #[serde(serialize_with = "serialize_category")]
    pub kind: NodeKind,
}

fn serialize_category<S: Serializer>(kind: &NodeKind, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.category())
}

/// Parse a plural category selector (`groups`, `subgroups`, `projects`).
pub fn parse_category(selector: &str) -> Result<NodeKind> {
    NodeKind::from_selector(selector).ok_or_else(|| CoreError::UnknownCategory {
        selector: selector.to_string(),
    })
}

/// List every node, or only those of the selected category.
pub fn catalog<'a>(snapshot: &'a Snapshot, selector: Option<&str>) -> Result<Vec<CatalogEntry<'a>>> {
    let kind = selector.map(parse_category).transpose()?;
    Ok(snapshot
        .nodes()
        .filter(|node| kind.is_none_or(|k| node.kind == k))
        .map(|node| CatalogEntry {
            id: &node.id,
            name: &node.name,
            kind: node.kind,
        })
        .collect())
}

/// Every node of one category, in load order.
pub fn members(snapshot: &Snapshot, kind: NodeKind) -> Vec<&Node> {
    snapshot.nodes().filter(|node| node.kind == kind).collect()
}

/// The first node of `kind` named `name`.
pub fn find_by_name<'a>(snapshot: &'a Snapshot, kind: NodeKind, name: &str) -> Result<&'a Node> {
    snapshot
        .find_by_name(name)
        .find(|node| node.kind == kind)
        .ok_or_else(|| CoreError::NodeNotFound {
            key: name.to_string(),
        })
}

/// The node of `kind` with id `id`.
pub fn find_by_id<'a>(snapshot: &'a Snapshot, kind: NodeKind, id: &NodeId) -> Result<&'a Node> {
    snapshot
        .node(id)
        .filter(|node| node.kind == kind)
        .ok_or_else(|| CoreError::NodeNotFound { key: id.to_string() })
}
