//! Read-only view of a navigation graph that the search algorithms run over.
use bevy::math::Vec3;

use crate::{node::NavNode, NodeId};

/// A graph of [`NavNode`]s addressed by dense [`NodeId`]s.
///
/// [`crate::grid::SphereGrid`] implements this for the sphere surface and
/// plain slices of nodes implement it for hand-built graphs.
pub trait NavGraph {
    /// Number of nodes. Ids run from `0` to `node_count() - 1`.
    fn node_count(&self) -> usize;

    fn node(&self, id: NodeId) -> Option<&NavNode>;

    /// Iterates all nodes in id order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NavNode)> + '_ {
        (0..self.node_count()).filter_map(move |id| self.node(id).map(|node| (id, node)))
    }

    /// Id of the node whose position is closest to `point`.
    /// Exact ties go to the lowest id.
    fn closest_node(&self, point: Vec3) -> Option<NodeId> {
        let mut closest = f32::MAX;
        let mut closest_id = None;

        for (id, node) in self.iter_nodes() {
            let distance = node.position.distance_squared(point);
            if distance < closest {
                closest = distance;
                closest_id = Some(id);
            }
        }

        closest_id
    }
}

impl NavGraph for [NavNode] {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn node(&self, id: NodeId) -> Option<&NavNode> {
        self.get(id)
    }
}

impl NavGraph for Vec<NavNode> {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn node(&self, id: NodeId) -> Option<&NavNode> {
        self.get(id)
    }
}
