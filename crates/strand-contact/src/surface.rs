//! Surface query trait.

use strand_math::Vec3;

/// Read-only geometric queries against a closed surface, in world space.
///
/// Shared across solver threads, so implementations must be `Send + Sync`
/// and must not mutate state while answering queries.
pub trait SurfaceQuery: Send + Sync {
    /// Number of surface crossings on the segment `start + t·direction`
    /// for `t ∈ (0, 1]`.
    fn intersections_along_segment(&self, start: Vec3, direction: Vec3) -> usize;

    /// Nearest surface point to `point`, or `None` when it cannot be
    /// resolved (degenerate geometry).
    fn closest_point(&self, point: Vec3) -> Option<Vec3>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// True when the segment parameter `t` lies in the half-open range `(0, 1]`.
///
/// Excluding the start and including the end means a crossing exactly at a
/// shared vertex is counted once along a polyline.
#[inline]
pub(crate) fn in_segment(t: f64) -> bool {
    t > 0.0 && t <= 1.0
}
