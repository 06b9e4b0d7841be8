//! Half-space surface bounded by an infinite plane.
//!
//! Everything on the opposite side of the normal is inside. Useful as a
//! ground plane for pushing guides into a flat surface.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;

use crate::surface::{in_segment, SurfaceQuery};

/// Plane through `point` with outward unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSurface {
    /// Any point on the plane.
    pub point: Vec3,
    /// Outward normal (unit length).
    pub normal: Vec3,
}

impl PlaneSurface {
    /// Creates a plane, normalizing `normal` (falls back to +Y when zero).
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or(Vec3::Y),
        }
    }

    /// Horizontal ground plane at `y = height`, facing +Y.
    pub fn ground(height: f64) -> Self {
        Self::new(Vec3::new(0.0, height, 0.0), Vec3::Y)
    }

    /// Signed distance from the plane, negative inside.
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        (p - self.point).dot(self.normal)
    }
}

impl SurfaceQuery for PlaneSurface {
    fn intersections_along_segment(&self, start: Vec3, direction: Vec3) -> usize {
        let denom = direction.dot(self.normal);
        if denom.abs() < 1e-15 {
            return 0;
        }
        let t = -self.signed_distance(start) / denom;
        usize::from(in_segment(t))
    }

    fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        Some(point - self.normal * self.signed_distance(point))
    }

    fn name(&self) -> &str {
        "plane"
    }
}
