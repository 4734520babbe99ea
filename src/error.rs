//! Errors returned while building a [`crate::grid::SphereGrid`].
use thiserror::Error;

use crate::face::Face;

/// Grid construction failed and no usable grid was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The surface probe found nothing under a cell. Every cell has to land
    /// on the world for the face grids to stay dense.
    #[error("surface probe found no surface under cell ({x}, {y}) of the {face} face")]
    NoSurfaceHit { face: Face, x: usize, y: usize },
}
