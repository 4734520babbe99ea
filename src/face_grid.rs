//! Sampling of a single cube face into a grid of [`NavNode`]s.
use bevy::{
    log::error,
    math::{IVec3, Vec3},
};
use ndarray::Array2;

use crate::{
    error::BuildError,
    face::{lattice_percent, seam_key, spherify, Face},
    grid::SphereGridSettings,
    node::NavNode,
    probe::SurfaceProbe,
    NodeId,
};

/// Offsets to the up to 8 lattice neighbors of a cell.
const LATTICE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The nodes sampled for one [`Face`], indexed `[[x, y]]`.
#[derive(Debug, Clone)]
pub struct FaceGrid {
    face: Face,
    nodes: Array2<NavNode>,
}

impl FaceGrid {
    pub fn face(&self) -> Face {
        self.face
    }

    /// Width and height of the grid.
    pub fn resolution(&self) -> usize {
        self.nodes.shape()[0]
    }

    /// Node at lattice position `(x, y)`.
    pub fn node(&self, x: usize, y: usize) -> Option<&NavNode> {
        self.nodes.get([x, y])
    }

    pub(crate) fn node_mut(&mut self, x: usize, y: usize) -> Option<&mut NavNode> {
        self.nodes.get_mut([x, y])
    }

    /// Iterates the nodes as `((x, y), node)` in memory order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &NavNode)> {
        self.nodes.indexed_iter()
    }
}

/// A border cell waiting to be stitched to a cell of another face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BorderCell {
    pub(crate) key: IVec3,
    pub(crate) id: NodeId,
}

/// Output of the build phase for one face.
#[derive(Debug, Clone)]
pub(crate) struct BuiltFace {
    pub(crate) grid: FaceGrid,
    /// Border cells in row order (`y` outer, `x` inner).
    pub(crate) border: Vec<BorderCell>,
}

/// Global id of the cell `(x, y)` on the face at `face_index`.
///
/// Ids follow build order: face by face, then row by row.
pub(crate) fn node_id(face_index: usize, x: usize, y: usize, resolution: usize) -> NodeId {
    face_index * resolution * resolution + y * resolution + x
}

/// Splits a global id back into `(face_index, x, y)`.
pub(crate) fn split_node_id(id: NodeId, resolution: usize) -> (usize, usize, usize) {
    let per_face = resolution * resolution;
    let local = id % per_face;
    (id / per_face, local % resolution, local / resolution)
}

/// Samples every cell of `face`, links each walkable cell to its walkable
/// lattice neighbors and collects the border cells for stitching.
///
/// Touches nothing outside the face so the six faces can be built in parallel.
pub(crate) fn build_face<P: SurfaceProbe + ?Sized>(
    face: Face,
    settings: &SphereGridSettings,
    probe: &P,
) -> Result<BuiltFace, BuildError> {
    let resolution = settings.resolution as usize;
    let face_index = face.index();

    let mut nodes = Array2::from_elem((resolution, resolution), NavNode::default());
    let mut border = Vec::new();

    for y in 0..resolution {
        for x in 0..resolution {
            let cube = face.cube_point(lattice_percent(x, y, resolution));
            let on_sphere = spherify(cube);

            let Some(hit) = probe.probe(
                on_sphere * settings.probe_distance,
                -on_sphere,
                settings.node_radius,
            ) else {
                error!("Surface probe missed the world at {face} ({x}, {y})");
                return Err(BuildError::NoSurfaceHit { face, x, y });
            };

            let walkable = !settings.obstacle_mask.contains(hit.layer);
            nodes[[x, y]] = NavNode::new(hit.point, walkable);

            if x == 0 || y == 0 || x == resolution - 1 || y == resolution - 1 {
                border.push(BorderCell {
                    key: seam_key(cube, resolution),
                    id: node_id(face_index, x, y, resolution),
                });
            }
        }
    }

    link_lattice_neighbors(&mut nodes, face_index);

    Ok(BuiltFace {
        grid: FaceGrid { face, nodes },
        border,
    })
}

// Unwalkable cells get no links in either direction.
fn link_lattice_neighbors(nodes: &mut Array2<NavNode>, face_index: usize) {
    let resolution = nodes.shape()[0];

    for y in 0..resolution {
        for x in 0..resolution {
            if !nodes[[x, y]].walkable {
                continue;
            }

            for &(dx, dy) in LATTICE_OFFSETS.iter() {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if nx >= resolution || ny >= resolution {
                    continue;
                }

                let neighbor = &nodes[[nx, ny]];
                if !neighbor.walkable {
                    continue;
                }

                let position: Vec3 = neighbor.position;
                nodes[[x, y]].add_neighbor(node_id(face_index, nx, ny, resolution), position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SphereGridSettingsBuilder;
    use crate::probe::{LayerMask, ProbeHit, SphereWorld};

    #[test]
    fn test_node_id_round_trip() {
        let resolution = 5;
        let id = node_id(3, 2, 4, resolution);
        assert_eq!(split_node_id(id, resolution), (3, 2, 4));
        assert_eq!(node_id(0, 0, 0, resolution), 0);
        assert_eq!(node_id(1, 0, 0, resolution), 25);
    }

    #[test]
    fn test_build_face_open_world() {
        let settings = SphereGridSettingsBuilder::new(4).build();
        let world = SphereWorld::new(10.0, 0);

        let built = build_face(Face::Up, &settings, &world).unwrap();

        assert_eq!(built.grid.resolution(), 4);
        // 16 cells, 4 interior
        assert_eq!(built.border.len(), 12);

        let corner = built.grid.node(0, 0).unwrap();
        let edge = built.grid.node(1, 0).unwrap();
        let inner = built.grid.node(1, 1).unwrap();
        assert_eq!(corner.neighbors().len(), 3);
        assert_eq!(edge.neighbors().len(), 5);
        assert_eq!(inner.neighbors().len(), 8);

        for (_, node) in built.grid.iter() {
            assert!(node.is_walkable());
            assert!((node.position().length() - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unwalkable_cells_are_not_linked() {
        let settings = SphereGridSettingsBuilder::new(3)
            .obstacle_mask(LayerMask::from_layers(&[1]))
            .build();

        // The center of the face sits on layer 1
        let probe = |origin: Vec3, _: Vec3, _: f32| {
            let point = origin.normalize();
            let layer = if point.y > 0.99 { 1 } else { 0 };
            Some(ProbeHit::new(point, layer))
        };

        let built = build_face(Face::Up, &settings, &probe).unwrap();
        let center = built.grid.node(1, 1).unwrap();
        let center_id = node_id(Face::Up.index(), 1, 1, 3);

        assert!(!center.is_walkable());
        assert!(center.neighbors().is_empty());
        for (_, node) in built.grid.iter() {
            assert!(!node.has_neighbor(center_id));
        }
        // Corner loses its diagonal to the center
        assert_eq!(built.grid.node(0, 0).unwrap().neighbors().len(), 2);
    }

    #[test]
    fn test_probe_miss_is_an_error() {
        let settings = SphereGridSettingsBuilder::new(3).build();
        let probe = |origin: Vec3, _: Vec3, _: f32| {
            if origin.x > 0.0 && origin.z > 0.0 {
                None
            } else {
                Some(ProbeHit::new(origin.normalize(), 0))
            }
        };

        let err = build_face(Face::Up, &settings, &probe).unwrap_err();
        match err {
            BuildError::NoSurfaceHit { face, x, y } => {
                assert_eq!(face, Face::Up);
                assert_eq!((x, y), (2, 0));
            }
        }
    }
}
