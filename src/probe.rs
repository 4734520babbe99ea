//! Surface probing used to sample walkability while building the face grids.
//!
//! The grid never looks at world geometry directly. It casts a thick ray from
//! outside the sphere toward the center through a [`SurfaceProbe`] and reads
//! back where it hit and which layer the surface belongs to.
use bevy::math::Vec3;

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Contact point on the surface that was hit.
    pub point: Vec3,
    /// Collision layer of the surface, `0..32`.
    pub layer: u32,
}

impl ProbeHit {
    pub fn new(point: Vec3, layer: u32) -> Self {
        ProbeHit { point, layer }
    }
}

/// Anything that can answer "what does a sphere of `radius` swept from
/// `origin` along `direction` touch first".
///
/// Implemented for closures so tests and small worlds can pass a function.
pub trait SurfaceProbe: Send + Sync {
    fn probe(&self, origin: Vec3, direction: Vec3, radius: f32) -> Option<ProbeHit>;
}

impl<F> SurfaceProbe for F
where
    F: Fn(Vec3, Vec3, f32) -> Option<ProbeHit> + Send + Sync,
{
    fn probe(&self, origin: Vec3, direction: Vec3, radius: f32) -> Option<ProbeHit> {
        self(origin, direction, radius)
    }
}

/// Bit set of collision layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing the given layers.
    pub fn from_layers(layers: &[u32]) -> Self {
        layers
            .iter()
            .fold(LayerMask::NONE, |mask, &layer| mask.with(layer))
    }

    pub fn with(self, layer: u32) -> Self {
        LayerMask(self.0 | Self::bit(layer))
    }

    pub fn contains(self, layer: u32) -> bool {
        self.0 & Self::bit(layer) != 0
    }

    fn bit(layer: u32) -> u32 {
        1u32.checked_shl(layer).unwrap_or(0)
    }
}

/// A solid ball in a [`SphereWorld`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub center: Vec3,
    pub radius: f32,
    pub layer: u32,
}

impl Ball {
    pub fn new(center: Vec3, radius: f32, layer: u32) -> Self {
        Ball {
            center,
            radius,
            layer,
        }
    }

    /// Distance along the cast at which a sphere of `probe_radius` first touches
    /// this ball, and the contact point on the ball's surface.
    fn sphere_cast(&self, origin: Vec3, direction: Vec3, probe_radius: f32) -> Option<(f32, Vec3)> {
        let reach = self.radius + probe_radius;

        // Solved from the closest approach so casts from far away stay precise
        let along = (self.center - origin).dot(direction);
        let closest = origin + direction * along;
        let offset_sq = closest.distance_squared(self.center);
        if offset_sq > reach * reach {
            return None;
        }

        let t = along - (reach * reach - offset_sq).sqrt();
        if t < 0.0 {
            return None;
        }

        let probe_center = origin + direction * t;
        let contact = self.center + (probe_center - self.center) * (self.radius / reach);
        Some((t, contact))
    }
}

/// A planet made of balls: the ground sphere around the origin plus any
/// number of obstacles sitting on or above it.
///
/// Good enough to stand in for a physics scene in tests, benches and demos.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereWorld {
    ground: Ball,
    obstacles: Vec<Ball>,
}

impl SphereWorld {
    /// A world with a ground sphere of `radius` on `layer` centered at the origin.
    pub fn new(radius: f32, layer: u32) -> Self {
        SphereWorld {
            ground: Ball::new(Vec3::ZERO, radius, layer),
            obstacles: Vec::new(),
        }
    }

    /// Adds an obstacle ball.
    pub fn with_obstacle(mut self, obstacle: Ball) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn ground(&self) -> &Ball {
        &self.ground
    }

    pub fn obstacles(&self) -> &[Ball] {
        &self.obstacles
    }
}

impl SurfaceProbe for SphereWorld {
    fn probe(&self, origin: Vec3, direction: Vec3, radius: f32) -> Option<ProbeHit> {
        let direction = direction.try_normalize()?;

        std::iter::once(&self.ground)
            .chain(self.obstacles.iter())
            .filter_map(|ball| {
                ball.sphere_cast(origin, direction, radius)
                    .map(|(t, point)| (t, ProbeHit::new(point, ball.layer)))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::from_layers(&[3, 8]);
        assert!(mask.contains(3));
        assert!(mask.contains(8));
        assert!(!mask.contains(0));
        assert!(!LayerMask::NONE.contains(0));
        assert!(!mask.contains(40));
    }

    #[test]
    fn test_ground_hit_is_on_surface() {
        let world = SphereWorld::new(10.0, 0);
        let hit = world
            .probe(Vec3::new(0.0, 1000.0, 0.0), Vec3::NEG_Y, 0.5)
            .unwrap();

        assert!((hit.point - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-3);
        assert_eq!(hit.layer, 0);
    }

    #[test]
    fn test_obstacle_hit_first() {
        let world = SphereWorld::new(10.0, 0).with_obstacle(Ball::new(Vec3::new(0.0, 11.0, 0.0), 2.0, 5));
        let hit = world
            .probe(Vec3::new(0.0, 1000.0, 0.0), Vec3::NEG_Y, 0.5)
            .unwrap();

        assert_eq!(hit.layer, 5);
        assert!((hit.point - Vec3::new(0.0, 13.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_miss() {
        let world = SphereWorld::new(10.0, 0);
        assert!(world
            .probe(Vec3::new(100.0, 0.0, 0.0), Vec3::X, 0.5)
            .is_none());
    }

    #[test]
    fn test_closure_probe() {
        let probe = |origin: Vec3, _: Vec3, _: f32| Some(ProbeHit::new(origin.normalize(), 1));
        let hit = probe.probe(Vec3::new(0.0, 0.0, 50.0), Vec3::NEG_Z, 0.1).unwrap();
        assert_eq!(hit.point, Vec3::Z);
        assert_eq!(hit.layer, 1);
    }
}
