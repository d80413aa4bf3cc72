//! Core data structures for the organization graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque metadata carried by a node (description, url, timestamps,
/// language breakdown, ingestion errors). Never interpreted by the core.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Stable node identifier. The scraper emits both strings and integers,
/// so ids are normalized to their string form and compared as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id.to_string())
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for NodeId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => NodeId(s),
            RawId::Signed(n) => NodeId(n.to_string()),
            RawId::Unsigned(n) => NodeId(n.to_string()),
        }
    }
}

/// Which level of the organization a node sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Group,
    Subgroup,
    /// Terminal item: a project or repository.
    #[serde(alias = "code", alias = "project")]
    LeafItem,
}

impl NodeKind {
    /// Map a scraper category (`_data.type`) onto a kind.
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "group" => Some(NodeKind::Group),
            "subgroup" => Some(NodeKind::Subgroup),
            "code" | "project" | "leaf-item" => Some(NodeKind::LeafItem),
            _ => None,
        }
    }

    /// Map a plural catalog selector (`groups`, `subgroups`, `projects`).
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "groups" => Some(NodeKind::Group),
            "subgroups" => Some(NodeKind::Subgroup),
            "projects" => Some(NodeKind::LeafItem),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Subgroup => "subgroup",
            NodeKind::LeafItem => "leaf-item",
        }
    }

    /// Singular catalog label; projects are listed as `project`.
    pub fn category(self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Subgroup => "subgroup",
            NodeKind::LeafItem => "project",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::Subgroup)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group, subgroup or project in the organization graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Presentation hint, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<serde_json::Value>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            kind,
            color: None,
            attributes: Attributes::new(),
        }
    }
}

/// Relation carried by an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeLabel {
    /// `from` is directly contained in `to`.
    OwnedBy,
    /// Any other relation. Kept for visualizers, never traversed.
    Other(String),
}

impl EdgeLabel {
    pub const OWNED_BY: &'static str = "ownedby";

    pub fn is_containment(&self) -> bool {
        matches!(self, EdgeLabel::OwnedBy)
    }
}

impl From<String> for EdgeLabel {
    fn from(label: String) -> Self {
        if label == Self::OWNED_BY {
            EdgeLabel::OwnedBy
        } else {
            EdgeLabel::Other(label)
        }
    }
}

impl From<EdgeLabel> for String {
    fn from(label: EdgeLabel) -> Self {
        match label {
            EdgeLabel::OwnedBy => EdgeLabel::OWNED_BY.to_string(),
            EdgeLabel::Other(s) => s,
        }
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The scraper writes the source id as `id`.
    #[serde(alias = "id")]
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
}

impl Edge {
    /// Containment edge: `child` is owned by `owner`.
    pub fn owned_by(child: impl Into<NodeId>, owner: impl Into<NodeId>) -> Self {
        Edge {
            from: child.into(),
            to: owner.into(),
            label: Some(EdgeLabel::OwnedBy),
        }
    }

    pub fn is_containment(&self) -> bool {
        self.label.as_ref().is_some_and(EdgeLabel::is_containment)
    }
}
