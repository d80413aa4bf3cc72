//! Immutable graph snapshot backed by petgraph::StableDiGraph

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeFiltered, EdgeRef};

use crate::error::{CoreError, Result};
use crate::model::{Edge, Node, NodeId};

/// One read-only copy of the node/edge graph.
///
/// Edges run from the owned node to its owner, mirroring the `ownedby`
/// records the scraper writes. Edges whose endpoints do not resolve are
/// kept aside as inert: they are reported by [`Snapshot::edges`] but never
/// traversed.
pub struct Snapshot {
    inner: StableDiGraph<Node, Edge>,
    index: HashMap<NodeId, NodeIndex>,
    inert: Vec<Edge>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .field("inert_edges", &self.inert.len())
            .finish()
    }
}

impl Snapshot {
    /// Build a snapshot. Fails if two nodes share an id.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut inner = StableDiGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                return Err(CoreError::DuplicateNode { id: node.id });
            }
            let id = node.id.clone();
            let idx = inner.add_node(node);
            index.insert(id, idx);
        }

        let mut inert = Vec::new();
        for edge in edges {
            match (index.get(&edge.from), index.get(&edge.to)) {
                (Some(&from), Some(&to)) => {
                    inner.add_edge(from, to, edge);
                }
                _ => {
                    tracing::debug!("Inert edge {} -> {}", edge.from, edge.to);
                    inert.push(edge);
                }
            }
        }

        Ok(Snapshot { inner, index, inert })
    }

    /// A snapshot with no nodes and no edges.
    pub fn empty() -> Self {
        Snapshot {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
            inert: Vec::new(),
        }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges, inert ones included.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count() + self.inert.len()
    }

    /// Number of edges whose endpoints do not resolve.
    pub fn inert_edge_count(&self) -> usize {
        self.inert.len()
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Iterate over all nodes in load order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges: traversable ones in load order, then inert ones.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
            .chain(self.inert.iter())
    }

    /// All nodes whose name matches exactly.
    pub fn find_by_name<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Node> + use<'a, 'n> {
        self.nodes().filter(move |n| n.name == name)
    }

    /// A node on some containment cycle, if the `ownedby` edges loop.
    pub(crate) fn containment_cycle(&self) -> Option<&Node> {
        let containment = EdgeFiltered::from_fn(&self.inner, |edge| edge.weight().is_containment());
        toposort(&containment, None)
            .err()
            .map(|cycle| &self.inner[cycle.node_id()])
    }

    pub(crate) fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.node_indices()
    }

    pub(crate) fn weight(&self, idx: NodeIndex) -> &Node {
        &self.inner[idx]
    }

    pub(crate) fn edge_weight(&self, idx: EdgeIndex) -> &Edge {
        &self.inner[idx]
    }

    /// Edges touching `idx` in the given direction, in load order, paired
    /// with the node on the other end.
    pub(crate) fn adjacent(
        &self,
        idx: NodeIndex,
        direction: Direction,
    ) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut adjacent: Vec<(EdgeIndex, NodeIndex)> = self
            .inner
            .edges_directed(idx, direction)
            .map(|edge_ref| {
                let other = match direction {
                    Direction::Outgoing => edge_ref.target(),
                    Direction::Incoming => edge_ref.source(),
                };
                (edge_ref.id(), other)
            })
            .collect();
        // petgraph walks its adjacency lists newest-first
        adjacent.sort_by_key(|(edge, _)| *edge);
        adjacent
    }

    /// Traversable edges in load order with their endpoints.
    pub(crate) fn edge_endpoints(&self) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex)> + '_ {
        self.inner.edge_indices().filter_map(move |idx| {
            self.inner
                .edge_endpoints(idx)
                .map(|(source, target)| (idx, source, target))
        })
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
