//! Procedural guide generators for benchmarks and testing.
//!
//! Guides are generated straight along the local +Y axis (the root normal)
//! and placed over simple analytic surfaces with matching transforms.

use strand_math::Vec3;
use strand_types::GuideId;

use crate::guide::GuideCurve;
use crate::position::GuidePosition;
use crate::selection::SelectedGuide;

/// A straight guide of `vertex_count` vertices along local +Y.
///
/// # Example
/// ```
/// use strand_guide::generators::straight_guide;
/// let g = straight_guide(5, 0.25);
/// assert_eq!(g.vertex_count(), 5);
/// assert!(g.max_length_error() < 1e-12);
/// ```
pub fn straight_guide(vertex_count: usize, segment_length: f64) -> GuideCurve {
    let vertices = (0..vertex_count)
        .map(|i| Vec3::new(0.0, i as f64 * segment_length, 0.0))
        .collect();
    GuideCurve::new(vertices, segment_length)
}

/// Guides rooted on a sphere, one per (latitude, longitude) sample of the
/// upper hemisphere.
///
/// # Arguments
/// - `rings`: Number of latitude rings (excluding the pole).
/// - `per_ring`: Guides per ring.
pub fn sphere_guides(
    center: Vec3,
    radius: f64,
    rings: usize,
    per_ring: usize,
    vertex_count: usize,
    segment_length: f64,
) -> Vec<SelectedGuide> {
    let mut guides = Vec::with_capacity(rings * per_ring);
    let mut next_id = 0u32;

    for ring in 0..rings {
        // Stay within the upper hemisphere, away from the pole.
        let phi = std::f64::consts::FRAC_PI_2 * (ring + 1) as f64 / (rings + 1) as f64;
        for k in 0..per_ring {
            let theta = std::f64::consts::TAU * k as f64 / per_ring as f64;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            let root = center + normal * radius;
            guides.push(SelectedGuide::new(
                GuideId(next_id),
                GuidePosition::at_root(root, normal),
                straight_guide(vertex_count, segment_length),
            ));
            next_id += 1;
        }
    }

    guides
}

/// Guides rooted on the horizontal plane `y = height`, on a square grid
/// of `side × side` roots spaced `spacing` apart and centered at the origin.
pub fn plane_guides(
    height: f64,
    side: usize,
    spacing: f64,
    vertex_count: usize,
    segment_length: f64,
) -> Vec<SelectedGuide> {
    let half = (side.saturating_sub(1)) as f64 * spacing * 0.5;
    let mut guides = Vec::with_capacity(side * side);
    let mut next_id = 0u32;

    for j in 0..side {
        for i in 0..side {
            let root = Vec3::new(i as f64 * spacing - half, height, j as f64 * spacing - half);
            guides.push(SelectedGuide::new(
                GuideId(next_id),
                GuidePosition::at_root(root, Vec3::Y),
                straight_guide(vertex_count, segment_length),
            ));
            next_id += 1;
        }
    }

    guides
}
