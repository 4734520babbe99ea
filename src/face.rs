//! Cube faces and the cube to sphere mapping used to lay out the face grids.
use bevy::math::{IVec3, Vec2, Vec3};
use strum::{Display, EnumCount, EnumIter};

/// One of the six faces of the cube that gets warped onto the sphere.
///
/// Faces are built in declaration order, which also decides which cell
/// registers first in the seam table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum Face {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Back,
}

impl Face {
    /// Index of the face in build order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Outward normal of the face.
    pub fn local_up(self) -> Vec3 {
        match self {
            Face::Up => Vec3::Y,
            Face::Down => Vec3::NEG_Y,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
            Face::Forward => Vec3::Z,
            Face::Back => Vec3::NEG_Z,
        }
    }

    /// The two in-face axes. The first is a rotation of the normal's
    /// components, the second is the normal crossed with the first.
    pub fn axes(self) -> (Vec3, Vec3) {
        let up = self.local_up();
        let axis_a = Vec3::new(up.y, up.z, up.x);
        let axis_b = up.cross(axis_a);
        (axis_a, axis_b)
    }

    /// Maps a face-local percentage in `[0, 1]²` to a point on the surface
    /// of the cube spanning `[-1, 1]³`.
    pub fn cube_point(self, percent: Vec2) -> Vec3 {
        let (axis_a, axis_b) = self.axes();
        self.local_up() + (percent.x - 0.5) * 2.0 * axis_a + (percent.y - 0.5) * 2.0 * axis_b
    }
}

/// Lattice position `(x, y)` of a `resolution`-wide grid as a percentage of the face.
pub(crate) fn lattice_percent(x: usize, y: usize, resolution: usize) -> Vec2 {
    Vec2::new(x as f32, y as f32) / (resolution - 1) as f32
}

/// Warps a point on the cube surface onto the unit sphere.
///
/// Each component is scaled by a factor of the other two, which spreads the
/// cells more evenly than normalizing and keeps cube corners from bunching up.
pub fn spherify(cube: Vec3) -> Vec3 {
    let x2 = cube.x * cube.x;
    let y2 = cube.y * cube.y;
    let z2 = cube.z * cube.z;

    Vec3::new(
        cube.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).max(0.0).sqrt(),
        cube.y * (1.0 - x2 / 2.0 - z2 / 2.0 + x2 * z2 / 3.0).max(0.0).sqrt(),
        cube.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).max(0.0).sqrt(),
    )
}

/// Integer key of a cube surface point. Cells of different faces that sit on
/// the same cube edge or corner produce the same key.
pub(crate) fn seam_key(cube: Vec3, resolution: usize) -> IVec3 {
    (cube * resolution as f32).as_ivec3()
}
