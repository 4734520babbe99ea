//! This module defines the `Path` component returned by path queries.
use bevy::math::Vec3;
use bevy::prelude::Component;
use std::collections::VecDeque;

/// The result of a path query across the sphere.
///
/// Positions come back in search order: from the node nearest the target back
/// toward the start, with the start node itself left out. Call
/// [`Path::reverse`] to walk it from the start instead.
///
/// If using [`crate::plugin::SphereNavPlugin`] this is inserted as a component
/// on the entity that requested the path.
#[derive(Debug, Clone, Component)]
pub struct Path {
    pub(crate) path: VecDeque<Vec3>,
    cost: f32,
    is_reversed: bool,
}

impl Path {
    /// Create a new path from a vector of positions
    /// # Arguments
    /// * `path` - A vector of `Vec3` positions
    /// * `cost` - The total length of the path along the graph edges
    ///
    pub fn new(path: Vec<Vec3>, cost: f32) -> Self {
        Path {
            path: path.into_iter().collect(),
            cost,
            is_reversed: false,
        }
    }

    /// Create a new path from a slice of positions
    pub fn from_slice(path: &[Vec3], cost: f32) -> Self {
        Path {
            path: path.iter().copied().collect(),
            cost,
            is_reversed: false,
        }
    }

    /// Returns true if the path contains the given position
    pub fn is_position_in_path(&self, pos: Vec3) -> bool {
        self.path.contains(&pos)
    }

    /// Returns the path as a slice of positions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bevy::math::Vec3;
    /// use bevy_sphere_nav::prelude::*;
    ///
    /// let path = Path::new(vec![Vec3::X, Vec3::Y], 1.5);
    /// assert_eq!(path.path(), &[Vec3::X, Vec3::Y]);
    /// ```
    pub fn path(&self) -> &[Vec3] {
        self.path.as_slices().0
    }

    /// Returns the length of the path along the graph edges.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Returns the number of positions in the path
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns true if the path is empty
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// True once the path has been flipped into start-to-target order.
    pub fn is_reversed(&self) -> bool {
        self.is_reversed
    }

    /// Reverse the path in place.
    pub fn reverse(&mut self) {
        self.path.make_contiguous().reverse();
        self.is_reversed = !self.is_reversed;
    }

    /// Pops the first position of the path.
    pub fn pop(&mut self) -> Option<Vec3> {
        self.path.pop_front()
    }

    /// Returns the next position in the path without removing it.
    pub fn next(&self) -> Option<Vec3> {
        self.path.front().copied()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl IntoIterator for Path {
    type Item = Vec3;
    type IntoIter = std::collections::vec_deque::IntoIter<Vec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.path.into_iter()
    }
}
