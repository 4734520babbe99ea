//! This module defines the `NavNode` struct, a single vertex of the navigation graph.
use bevy::math::Vec3;
use smallvec::SmallVec;

use crate::NodeId;

/// A link from one [`NavNode`] to another with its precomputed length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// The node this link points to.
    pub id: NodeId,
    /// Straight line distance between the two node positions.
    pub distance: f32,
}

/// A `NavNode` is one sampled cell of a face grid.
///
/// Nodes never carry search state. A* keeps costs and parents in its own
/// per-query storage so a built grid can be searched from many threads.
#[derive(Debug, Clone, Default)]
pub struct NavNode {
    /// Where the surface probe hit the world for this cell.
    pub(crate) position: Vec3,
    /// False when the probe hit a surface on an obstacle layer.
    pub(crate) walkable: bool,
    /// Walkable nodes reachable in one step. Up to 8 lattice neighbors plus seam links.
    pub(crate) neighbors: SmallVec<[Neighbor; 8]>,
}

impl NavNode {
    pub(crate) fn new(position: Vec3, walkable: bool) -> Self {
        NavNode {
            position,
            walkable,
            neighbors: SmallVec::new(),
        }
    }

    /// Position of the node in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Links this node can step along.
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    /// Returns true if `id` is one of this node's neighbors.
    pub fn has_neighbor(&self, id: NodeId) -> bool {
        self.neighbors.iter().any(|n| n.id == id)
    }

    /// Adds a one way link to `id`. Callers link both directions themselves.
    pub(crate) fn add_neighbor(&mut self, id: NodeId, position: Vec3) {
        self.neighbors.push(Neighbor {
            id,
            distance: self.position.distance(position),
        });
    }
}
