//! Analytical sphere surface.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;

use crate::surface::{in_segment, SurfaceQuery};

/// Sphere of a given center and radius. The interior is inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereSurface {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius of the sphere.
    pub radius: f64,
}

impl SphereSurface {
    /// Creates a new sphere surface.
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Returns true if `p` is strictly inside the sphere.
    pub fn contains(&self, p: Vec3) -> bool {
        p.distance_squared(self.center) < self.radius * self.radius
    }
}

impl SurfaceQuery for SphereSurface {
    fn intersections_along_segment(&self, start: Vec3, direction: Vec3) -> usize {
        let oc = start - self.center;
        let a = direction.length_squared();
        if a < 1e-24 {
            return 0;
        }
        let b = 2.0 * direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        // Tangent rays do not cross the surface.
        let disc = b * b - 4.0 * a * c;
        if disc <= 0.0 {
            return 0;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);

        usize::from(in_segment(t0)) + usize::from(in_segment(t1))
    }

    fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        let offset = point - self.center;
        let dist = offset.length();
        if dist <= 1e-12 {
            // Every surface point is equally close to the center.
            return None;
        }
        Some(self.center + offset * (self.radius / dist))
    }

    fn name(&self) -> &str {
        "sphere"
    }
}
