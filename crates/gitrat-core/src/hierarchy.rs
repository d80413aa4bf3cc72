//! Hierarchy builder: the full forest behind the list view

use std::collections::HashSet;

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use crate::classify;
use crate::error::{CoreError, Result};
use crate::model::{Node, NodeKind};
use crate::snapshot::Snapshot;

/// A group or subgroup together with everything it directly contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationTree<'a> {
    pub node: &'a Node,
    pub children: Vec<HierarchyItem<'a>>,
}

/// One entry of the forest or of a container's child list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HierarchyItem<'a> {
    Container(PresentationTree<'a>),
    Leaf { node: &'a Node },
}

impl<'a> HierarchyItem<'a> {
    pub fn node(&self) -> &'a Node {
        match self {
            HierarchyItem::Container(tree) => tree.node,
            HierarchyItem::Leaf { node } => *node,
        }
    }

    /// Direct children; always empty for a leaf.
    pub fn children(&self) -> &[HierarchyItem<'a>] {
        match self {
            HierarchyItem::Container(tree) => &tree.children,
            HierarchyItem::Leaf { .. } => &[],
        }
    }

    /// Every leaf-item at or below this entry, depth-first.
    pub fn leaves(&self) -> Vec<&'a Node> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<&'a Node>) {
        match self {
            HierarchyItem::Container(tree) => {
                for child in &tree.children {
                    child.collect_leaves(out);
                }
            }
            HierarchyItem::Leaf { node } => out.push(*node),
        }
    }

    /// Number of entries at or below this one.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(HierarchyItem::size).sum::<usize>()
    }
}

/// Assemble the forest for a whole snapshot.
///
/// Roots are, in node order: every group, every subgroup without a
/// group/subgroup owner, and every project without one. Children keep
/// edge order. A node with several owners is placed once, under the first
/// owner reached. A containment cycle anywhere in the snapshot fails with
/// [`CoreError::CycleDetected`].
pub fn build_forest(snapshot: &Snapshot) -> Result<Vec<HierarchyItem<'_>>> {
    if let Some(node) = snapshot.containment_cycle() {
        return Err(CoreError::CycleDetected {
            node: node.id.clone(),
        });
    }

    let mut builder = ForestBuilder {
        snapshot,
        placed: HashSet::new(),
    };
    let mut forest = Vec::new();

    for idx in snapshot.node_indices() {
        let node = snapshot.weight(idx);
        match node.kind {
            NodeKind::Group => {
                forest.push(HierarchyItem::Container(builder.expand(idx)));
            }
            NodeKind::Subgroup if !classify::has_container_owner(snapshot, idx) => {
                tracing::debug!("Subgroup `{}` has no owner, promoting to root", node.name);
                forest.push(HierarchyItem::Container(builder.expand(idx)));
            }
            NodeKind::LeafItem if !classify::has_container_owner(snapshot, idx) => {
                builder.placed.insert(idx);
                forest.push(HierarchyItem::Leaf { node });
            }
            _ => {}
        }
    }

    Ok(forest)
}

struct ForestBuilder<'a> {
    snapshot: &'a Snapshot,
    /// Nodes already placed somewhere in the forest.
    placed: HashSet<NodeIndex>,
}

impl<'a> ForestBuilder<'a> {
    /// Expand a container into its tree. Only called on acyclic
    /// containment, so recursion depth is bounded by the longest chain.
    fn expand(&mut self, idx: NodeIndex) -> PresentationTree<'a> {
        let node = self.snapshot.weight(idx);
        self.placed.insert(idx);

        let mut children = Vec::new();
        for (_, child_idx) in classify::children(self.snapshot, idx) {
            let child = self.snapshot.weight(child_idx);
            if child.kind == NodeKind::Group {
                tracing::debug!("Group `{}` owned by `{}`, not nesting", child.name, node.name);
                continue;
            }
            if self.placed.contains(&child_idx) {
                tracing::debug!("`{}` already placed, skipping under `{}`", child.name, node.name);
                continue;
            }
            match child.kind {
                NodeKind::LeafItem => {
                    self.placed.insert(child_idx);
                    children.push(HierarchyItem::Leaf { node: child });
                }
                _ => children.push(HierarchyItem::Container(self.expand(child_idx))),
            }
        }

        PresentationTree { node, children }
    }
}
