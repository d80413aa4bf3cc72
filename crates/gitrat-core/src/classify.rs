//! Node classification and containment-edge lookups shared by every traversal

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use crate::model::{Node, NodeId, NodeKind};
use crate::snapshot::Snapshot;

pub fn is_group(node: &Node) -> bool {
    node.kind == NodeKind::Group
}

pub fn is_subgroup(node: &Node) -> bool {
    node.kind == NodeKind::Subgroup
}

pub fn is_leaf_item(node: &Node) -> bool {
    node.kind == NodeKind::LeafItem
}

/// Nodes directly contained in `id`, in edge order.
pub fn direct_children_of<'a>(snapshot: &'a Snapshot, id: &NodeId) -> Vec<&'a Node> {
    snapshot
        .index_of(id)
        .map(|idx| {
            children(snapshot, idx)
                .into_iter()
                .map(|(_, child)| snapshot.weight(child))
                .collect()
        })
        .unwrap_or_default()
}

/// Nodes that directly contain `id`, in edge order.
pub fn owners_of<'a>(snapshot: &'a Snapshot, id: &NodeId) -> Vec<&'a Node> {
    snapshot
        .index_of(id)
        .map(|idx| {
            owners(snapshot, idx)
                .into_iter()
                .map(|(_, owner)| snapshot.weight(owner))
                .collect()
        })
        .unwrap_or_default()
}

/// Incoming containment edges of `idx`.
pub(crate) fn children(snapshot: &Snapshot, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
    containment(snapshot, idx, Direction::Incoming)
}

/// Outgoing containment edges of `idx`.
pub(crate) fn owners(snapshot: &Snapshot, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
    containment(snapshot, idx, Direction::Outgoing)
}

/// Whether some group or subgroup owns `idx`. An `ownedby` edge that
/// points at a project does not count.
pub(crate) fn has_container_owner(snapshot: &Snapshot, idx: NodeIndex) -> bool {
    owners(snapshot, idx)
        .into_iter()
        .any(|(_, owner)| snapshot.weight(owner).kind.is_container())
}

fn containment(
    snapshot: &Snapshot,
    idx: NodeIndex,
    direction: Direction,
) -> Vec<(EdgeIndex, NodeIndex)> {
    snapshot
        .adjacent(idx, direction)
        .into_iter()
        .filter(|(edge, _)| snapshot.edge_weight(*edge).is_containment())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn sample() -> Snapshot {
        Snapshot::new(
            vec![
                Node::new("1", "G", NodeKind::Group),
                Node::new("2", "S", NodeKind::Subgroup),
                Node::new("3", "P", NodeKind::LeafItem),
                Node::new("4", "Q", NodeKind::LeafItem),
            ],
            vec![
                Edge::owned_by("2", "1"),
                Edge::owned_by("3", "2"),
                Edge::owned_by("4", "2"),
                Edge {
                    from: "3".into(),
                    to: "4".into(),
                    label: Some("forkedfrom".to_string().into()),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_kind_predicates() {
        let snapshot = sample();
        let g = snapshot.node(&"1".into()).unwrap();
        let p = snapshot.node(&"3".into()).unwrap();
        assert!(is_group(g));
        assert!(!is_subgroup(g));
        assert!(is_leaf_item(p));
        assert!(!is_group(p));
    }

    #[test]
    fn test_direct_children_follow_edge_order() {
        let snapshot = sample();
        let names: Vec<&str> = direct_children_of(&snapshot, &"2".into())
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["P", "Q"]);
    }

    #[test]
    fn test_non_containment_edges_ignored() {
        let snapshot = sample();
        assert!(direct_children_of(&snapshot, &"4".into()).is_empty());
        let owners: Vec<&str> = owners_of(&snapshot, &"3".into())
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(owners, vec!["S"]);
    }

    #[test]
    fn test_unknown_id_has_no_children() {
        let snapshot = sample();
        assert!(direct_children_of(&snapshot, &"99".into()).is_empty());
    }
}
