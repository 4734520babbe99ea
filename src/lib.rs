//! A* navigation across the surface of a sphere.
//!
//! Six cube faces are sampled into grids, warped onto the sphere and stitched
//! along their seams into one graph. See [`grid::SphereGrid`] to get started.
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

mod astar;
pub mod error;
pub mod face;
pub mod face_grid;
pub mod graph;
pub mod grid;
pub mod heap;
mod macros;
pub mod node;
pub mod path;
pub mod pathfind;
pub mod plugin;
pub mod probe;
pub mod seam;

pub mod prelude {
    pub use crate::error::BuildError;
    pub use crate::face::Face;
    pub use crate::face_grid::FaceGrid;
    pub use crate::graph::NavGraph;
    pub use crate::grid::{SphereGrid, SphereGridSettings, SphereGridSettingsBuilder};
    pub use crate::heap::{HeapItem, IndexedHeap};
    pub use crate::node::{NavNode, Neighbor};
    pub use crate::path::Path;
    pub use crate::pathfind::{pathfind, pathfind_nodes};
    pub use crate::plugin::{PathFailed, PathRequest, PathingSet, SphereNavPlugin};
    pub use crate::probe::{Ball, LayerMask, ProbeHit, SphereWorld, SurfaceProbe};
    pub use crate::seam::CornerStitching;
}

/// Index of a node in a [`graph::NavGraph`].
pub type NodeId = usize;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
