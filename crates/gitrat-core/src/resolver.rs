//! Descendant resolver: the connected subgraph around one named node
//!
//! The result holds the ancestor chain from the root down to the anchor,
//! the anchor itself and its whole descendant subtree, plus every
//! containment edge among those nodes. For a well-formed hierarchy the
//! result is a tree, so `nodes.len() == edges.len() + 1`. Anything else is
//! reported as-is and left to the caller to judge.

use std::collections::HashSet;

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::classify;
use crate::error::{CoreError, Result};
use crate::model::{Edge, Node};
use crate::snapshot::Snapshot;

/// Flat node and edge lists ready for a visualizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subgraph<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

impl<'a> Subgraph<'a> {
    /// One root, one component: exactly one edge fewer than nodes.
    pub fn is_tree(&self) -> bool {
        !self.nodes.is_empty() && self.edges.len() + 1 == self.nodes.len()
    }

    /// Reject anything that is not a tree with [`CoreError::MalformedSubgraph`].
    pub fn into_tree(self, anchor: &str) -> Result<Self> {
        if self.is_tree() {
            Ok(self)
        } else {
            Err(CoreError::MalformedSubgraph {
                anchor: anchor.to_string(),
                nodes: self.nodes.len(),
                edges: self.edges.len(),
            })
        }
    }
}

/// Resolve the subgraph around the node named `anchor`.
///
/// The name must match exactly one node. A containment cycle met on the
/// way up or down fails with [`CoreError::CycleDetected`].
pub fn resolve<'a>(snapshot: &'a Snapshot, anchor: &str) -> Result<Subgraph<'a>> {
    let mut matches = snapshot.find_by_name(anchor);
    let node = match (matches.next(), matches.next()) {
        (Some(node), None) => node,
        (None, _) => {
            return Err(CoreError::NodeNotFound {
                key: anchor.to_string(),
            });
        }
        (Some(_), Some(_)) => {
            return Err(CoreError::AmbiguousName {
                name: anchor.to_string(),
                count: snapshot.find_by_name(anchor).count(),
            });
        }
    };
    let start = snapshot
        .index_of(&node.id)
        .ok_or_else(|| CoreError::NodeNotFound {
            key: anchor.to_string(),
        })?;

    let mut ancestors = ancestors(snapshot, start)?;
    ancestors.reverse();
    let descendants = descendants(snapshot, start)?;

    let mut members: Vec<NodeIndex> = Vec::with_capacity(ancestors.len() + descendants.len() + 1);
    members.extend(ancestors);
    members.push(start);
    members.extend(descendants);

    let member_set: HashSet<NodeIndex> = members.iter().copied().collect();
    let edges = snapshot
        .edge_endpoints()
        .filter(|(_, source, target)| member_set.contains(source) && member_set.contains(target))
        .map(|(edge, _, _)| snapshot.edge_weight(edge))
        .filter(|edge| edge.is_containment())
        .collect::<Vec<_>>();
    let nodes = members.into_iter().map(|idx| snapshot.weight(idx)).collect::<Vec<_>>();

    tracing::debug!(
        "Resolved `{}`: {} nodes, {} edges",
        anchor,
        nodes.len(),
        edges.len()
    );
    Ok(Subgraph { nodes, edges })
}

/// Every node above `start`, nearest owner first.
pub(crate) fn ancestors(snapshot: &Snapshot, start: NodeIndex) -> Result<Vec<NodeIndex>> {
    let mut walk = Walk::new(snapshot, start, classify::owners);
    walk.visit(start)?;
    Ok(walk.order)
}

/// Every node below `start`, depth-first pre-order.
pub(crate) fn descendants(snapshot: &Snapshot, start: NodeIndex) -> Result<Vec<NodeIndex>> {
    let mut walk = Walk::new(snapshot, start, classify::children);
    walk.visit(start)?;
    Ok(walk.order)
}

type Step = fn(&Snapshot, NodeIndex) -> Vec<(EdgeIndex, NodeIndex)>;

/// Depth-first walk over containment edges in one direction.
///
/// `visited` guarantees termination; `on_path` tells a cycle apart from a
/// node reached twice through different branches.
struct Walk<'s> {
    snapshot: &'s Snapshot,
    step: Step,
    visited: HashSet<NodeIndex>,
    on_path: HashSet<NodeIndex>,
    order: Vec<NodeIndex>,
}

impl<'s> Walk<'s> {
    fn new(snapshot: &'s Snapshot, start: NodeIndex, step: Step) -> Self {
        Walk {
            snapshot,
            step,
            visited: HashSet::from([start]),
            on_path: HashSet::new(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, idx: NodeIndex) -> Result<()> {
        self.on_path.insert(idx);
        for (_, next) in (self.step)(self.snapshot, idx) {
            if self.on_path.contains(&next) {
                return Err(CoreError::CycleDetected {
                    node: self.snapshot.weight(next).id.clone(),
                });
            }
            if self.visited.insert(next) {
                self.order.push(next);
                self.visit(next)?;
            }
        }
        self.on_path.remove(&idx);
        Ok(())
    }
}
