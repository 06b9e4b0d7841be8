//! Per-vertex collision record.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;

/// Collision state of one guide vertex, in the guide's local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionInfo {
    /// Whether the vertex lies inside the query surface.
    pub is_colliding: bool,
    /// Nearest surface point. Zero when not colliding.
    pub closest_surface_point: Vec3,
    /// Unit direction from the vertex towards `closest_surface_point`.
    /// Only meaningful while colliding.
    pub surface_direction: Vec3,
}

impl CollisionInfo {
    /// Record for a vertex at `vertex` that penetrated and whose nearest
    /// surface point is `closest`.
    pub fn colliding(vertex: Vec3, closest: Vec3) -> Self {
        Self {
            is_colliding: true,
            closest_surface_point: closest,
            surface_direction: (closest - vertex).normalize_or_zero(),
        }
    }

    /// Resets to the non-colliding state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
