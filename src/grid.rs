//! This module contains the `SphereGrid` resource which is the main entry point for the crate.
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use bevy::{log::info, math::Vec3, prelude::Resource};
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    error::BuildError,
    face::Face,
    face_grid::{build_face, split_node_id, BuiltFace, FaceGrid},
    graph::NavGraph,
    node::NavNode,
    path::Path,
    pathfind::{pathfind, pathfind_nodes},
    probe::{LayerMask, SurfaceProbe},
    seam::{CornerStitching, SeamTable},
    timed, NodeId,
};

/// Settings for building a [`SphereGrid`]. Use [`SphereGridSettingsBuilder`] to create them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereGridSettings {
    /// Cells along each edge of a face. At least 2.
    pub(crate) resolution: u32,
    /// Radius of the sphere swept by the surface probe.
    pub(crate) node_radius: f32,
    /// Probe hits on these layers make a cell unwalkable.
    pub(crate) obstacle_mask: LayerMask,
    /// How far from the center the probe is cast from.
    pub(crate) probe_distance: f32,
    pub(crate) corner_stitching: CornerStitching,
}

impl SphereGridSettings {
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    pub fn obstacle_mask(&self) -> LayerMask {
        self.obstacle_mask
    }

    pub fn probe_distance(&self) -> f32 {
        self.probe_distance
    }

    pub fn corner_stitching(&self) -> CornerStitching {
        self.corner_stitching
    }
}

impl Default for SphereGridSettings {
    fn default() -> Self {
        SphereGridSettingsBuilder::default().build()
    }
}

/// Builder for [`SphereGridSettings`].
///
/// Example usage:
/// ```
/// use bevy_sphere_nav::prelude::*;
///
/// let settings = SphereGridSettingsBuilder::new(16)
///     .node_radius(0.25)
///     .obstacle_mask(LayerMask::from_layers(&[3]))
///     .build();
///
/// let grid = SphereGrid::new(&settings);
/// assert!(!grid.is_built());
/// ```
#[derive(Clone, Debug)]
pub struct SphereGridSettingsBuilder {
    settings: SphereGridSettings,
}

impl Default for SphereGridSettingsBuilder {
    fn default() -> Self {
        SphereGridSettingsBuilder {
            settings: SphereGridSettings {
                resolution: 16,
                node_radius: 0.5,
                obstacle_mask: LayerMask::NONE,
                probe_distance: 1000.0,
                corner_stitching: CornerStitching::default(),
            },
        }
    }
}

impl SphereGridSettingsBuilder {
    /// Start building settings for faces of `resolution` x `resolution` cells.
    /// Must be at least 2.
    pub fn new(resolution: u32) -> Self {
        if resolution < 2 {
            panic!("Resolution must be at least 2");
        }

        let mut builder = SphereGridSettingsBuilder::default();
        builder.settings.resolution = resolution;
        builder
    }

    /// Radius of the probe swept against the world for each cell.
    /// Must be greater than 0.
    pub fn node_radius(mut self, node_radius: f32) -> Self {
        if node_radius <= 0.0 {
            panic!("Node radius must be greater than 0");
        }

        self.settings.node_radius = node_radius;
        self
    }

    /// Cells whose probe hits a surface on any of these layers are unwalkable.
    pub fn obstacle_mask(mut self, mask: LayerMask) -> Self {
        self.settings.obstacle_mask = mask;
        self
    }

    /// Distance from the world center the probes start at.
    /// Needs to be outside anything in the world.
    pub fn probe_distance(mut self, distance: f32) -> Self {
        if distance <= 0.0 {
            panic!("Probe distance must be greater than 0");
        }

        self.settings.probe_distance = distance;
        self
    }

    /// How cube corners are stitched. See [`CornerStitching`].
    pub fn corner_stitching(mut self, mode: CornerStitching) -> Self {
        self.settings.corner_stitching = mode;
        self
    }

    /// Builds the [`SphereGridSettings`] to pass to [`SphereGrid::new()`].
    pub fn build(self) -> SphereGridSettings {
        self.settings
    }
}

/// `SphereGrid` is the navigation graph covering the whole sphere.
///
/// It owns one [`FaceGrid`] per cube [`Face`]. Nodes are addressed by a
/// [`NodeId`] that runs face by face in build order.
///
/// # Example
/// ```rust
/// use bevy::math::Vec3;
/// use bevy_sphere_nav::prelude::*;
///
/// let settings = SphereGridSettingsBuilder::new(8).build();
/// let world = SphereWorld::new(10.0, 0);
///
/// let mut grid = SphereGrid::new(&settings);
/// grid.build(&world).unwrap();
///
/// let path = grid.find_path(Vec3::new(0.0, 10.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
/// assert!(path.is_some());
/// ```
#[derive(Resource, Debug, Clone)]
pub struct SphereGrid {
    settings: SphereGridSettings,
    faces: Vec<FaceGrid>,
    built: bool,
}

impl SphereGrid {
    /// Creates an empty grid. Call [`SphereGrid::build`] before querying it.
    pub fn new(settings: &SphereGridSettings) -> Self {
        SphereGrid {
            settings: *settings,
            faces: Vec::with_capacity(Face::COUNT),
            built: false,
        }
    }

    /// Samples the six faces through `probe` and stitches them together.
    ///
    /// Faces are sampled in parallel when the `parallel` feature is enabled.
    /// Stitching always runs in face order on one thread.
    /// Building an already built grid replaces it.
    pub fn build<P: SurfaceProbe + ?Sized>(&mut self, probe: &P) -> Result<(), BuildError> {
        self.faces.clear();
        self.built = false;

        let start = std::time::Instant::now();
        let built_faces = timed!("Sampled faces", { self.sample_faces(probe)? });
        info!(
            "Sampled {} faces at resolution {} in {:?}",
            Face::COUNT,
            self.settings.resolution,
            start.elapsed()
        );

        let start = std::time::Instant::now();
        self.stitch_faces(built_faces);
        info!("Stitched face seams in {:?}", start.elapsed());

        self.built = true;
        Ok(())
    }

    fn sample_faces<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
    ) -> Result<Vec<BuiltFace>, BuildError> {
        let faces: Vec<Face> = Face::iter().collect();

        #[cfg(feature = "parallel")]
        let built = faces
            .par_iter()
            .map(|&face| build_face(face, &self.settings, probe))
            .collect::<Result<Vec<_>, _>>();

        #[cfg(not(feature = "parallel"))]
        let built = faces
            .iter()
            .map(|&face| build_face(face, &self.settings, probe))
            .collect::<Result<Vec<_>, _>>();

        built
    }

    // Runs after every face is sampled so the seam table has a single writer.
    fn stitch_faces(&mut self, built_faces: Vec<BuiltFace>) {
        let mut borders = Vec::with_capacity(built_faces.len());
        for built in built_faces {
            self.faces.push(built.grid);
            borders.push(built.border);
        }

        let mut table = SeamTable::new(self.settings.corner_stitching);
        let mut links = 0;

        for cell in borders.into_iter().flatten() {
            if !self.node_ref(cell.id).is_some_and(|node| node.walkable) {
                continue;
            }

            for other in table.stitch(cell) {
                self.link(cell.id, other);
                links += 1;
            }
        }

        info!("Stitched {} cross-face links", links);
    }

    fn link(&mut self, a: NodeId, b: NodeId) {
        let (Some(pos_a), Some(pos_b)) = (
            self.node_ref(a).map(|n| n.position),
            self.node_ref(b).map(|n| n.position),
        ) else {
            return;
        };

        if let Some(node) = self.node_mut(a) {
            node.add_neighbor(b, pos_b);
        }
        if let Some(node) = self.node_mut(b) {
            node.add_neighbor(a, pos_a);
        }
    }

    fn node_ref(&self, id: NodeId) -> Option<&NavNode> {
        let resolution = self.settings.resolution as usize;
        let (face, x, y) = split_node_id(id, resolution);
        self.faces.get(face)?.node(x, y)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NavNode> {
        let resolution = self.settings.resolution as usize;
        let (face, x, y) = split_node_id(id, resolution);
        self.faces.get_mut(face)?.node_mut(x, y)
    }

    /// Returns true once [`SphereGrid::build`] has succeeded.
    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn settings(&self) -> &SphereGridSettings {
        &self.settings
    }

    /// Cells along each edge of a face.
    pub fn resolution(&self) -> u32 {
        self.settings.resolution
    }

    /// Returns the [`FaceGrid`] of a face, `None` before the grid is built.
    pub fn face_grid(&self, face: Face) -> Option<&FaceGrid> {
        self.faces.get(face.index())
    }

    /// Iterates all face grids in build order.
    pub fn face_grids(&self) -> impl Iterator<Item = &FaceGrid> {
        self.faces.iter()
    }

    /// Iterates every node with its id.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NavNode)> {
        self.iter_nodes()
    }

    /// Returns the face and lattice position of a node.
    pub fn lattice_position(&self, id: NodeId) -> Option<(Face, usize, usize)> {
        if id >= NavGraph::node_count(self) {
            return None;
        }

        let (face, x, y) = split_node_id(id, self.settings.resolution as usize);
        let face = Face::iter().nth(face)?;
        Some((face, x, y))
    }

    /// Test if the node closest to `point` is walkable.
    pub fn is_walkable(&self, point: Vec3) -> bool {
        self.closest_node(point)
            .and_then(|id| self.node(id))
            .is_some_and(|node| node.walkable)
    }

    /// Checks if a path exists between the nodes closest to `start` and `target`.
    pub fn is_path_viable(&self, start: Vec3, target: Vec3) -> bool {
        self.find_path(start, target).is_some()
    }

    /// Finds the shortest walkable path between the nodes closest to `start` and `target`.
    ///
    /// # Arguments
    /// * `start` - World position to start from.
    /// * `target` - World position to reach.
    ///
    /// # Returns
    /// A [`Path`] ordered from the node closest to `target` back toward the start,
    /// not including the node closest to `start`. The path is empty when both
    /// positions resolve to the same node. `None` if either end is unwalkable
    /// or no path exists.
    ///
    /// # Panics
    /// If the grid has not been built.
    pub fn find_path(&self, start: Vec3, target: Vec3) -> Option<Path> {
        assert!(self.built, "SphereGrid::build must succeed before querying paths");
        pathfind(self, start, target)
    }

    /// Same as [`SphereGrid::find_path`] for node ids.
    ///
    /// # Panics
    /// If the grid has not been built.
    pub fn find_path_between(&self, start: NodeId, target: NodeId) -> Option<Path> {
        assert!(self.built, "SphereGrid::build must succeed before querying paths");
        pathfind_nodes(self, start, target)
    }
}

impl NavGraph for SphereGrid {
    fn node_count(&self) -> usize {
        let resolution = self.settings.resolution as usize;
        self.faces.len() * resolution * resolution
    }

    fn node(&self, id: NodeId) -> Option<&NavNode> {
        self.node_ref(id)
    }
}
