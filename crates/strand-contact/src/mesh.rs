//! Closed triangle-mesh surface.
//!
//! Segment crossings use the Möller–Trumbore ray/triangle test restricted
//! to the segment; closest points use the Voronoi-region walk over each
//! triangle. Both are brute force over all triangles, which is adequate
//! for the scalp-sized meshes a brush stroke touches.

use strand_math::Vec3;
use strand_types::{StrandError, StrandResult};

use crate::surface::{in_segment, SurfaceQuery};

/// Twice-area below which a triangle is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-14;

/// Segment parameters closer than this are one crossing (a hit on an
/// edge or vertex shared by several triangles).
const SAME_HIT_T: f64 = 1e-9;

/// Indexed triangle mesh in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSurface {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl MeshSurface {
    /// Builds a mesh surface, validating indices and positions.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> StrandResult<Self> {
        let mesh = Self {
            positions,
            triangles,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - At least one triangle
    /// - All indices are in range
    /// - All positions are finite
    pub fn validate(&self) -> StrandResult<()> {
        if self.triangles.is_empty() {
            return Err(StrandError::InvalidSurface("Mesh has no triangles".into()));
        }

        let n = self.positions.len() as u32;
        for (t, tri) in self.triangles.iter().enumerate() {
            if let Some(&idx) = tri.iter().find(|&&i| i >= n) {
                return Err(StrandError::InvalidSurface(format!(
                    "Triangle {t} index {idx} out of range (vertex count = {n})"
                )));
            }
        }

        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(StrandError::InvalidSurface(format!(
                "Vertex {i} has a non-finite position"
            )));
        }

        Ok(())
    }
}

impl SurfaceQuery for MeshSurface {
    fn intersections_along_segment(&self, start: Vec3, direction: Vec3) -> usize {
        let mut hits: Vec<f64> = (0..self.triangles.len())
            .filter_map(|t| {
                let [a, b, c] = self.triangle(t);
                segment_triangle_hit(start, direction, a, b, c)
            })
            .collect();
        hits.sort_by(f64::total_cmp);

        let mut count = 0;
        let mut last = f64::NEG_INFINITY;
        for t in hits {
            if t - last > SAME_HIT_T {
                count += 1;
            }
            last = t;
        }
        count
    }

    fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        let mut best: Option<(f64, Vec3)> = None;
        for t in 0..self.triangles.len() {
            let [a, b, c] = self.triangle(t);
            if (b - a).cross(c - a).length() < DEGENERATE_AREA {
                continue;
            }
            let q = closest_point_on_triangle(point, a, b, c);
            let d2 = q.distance_squared(point);
            if best.map_or(true, |(bd, _)| d2 < bd) {
                best = Some((d2, q));
            }
        }
        best.map(|(_, q)| q)
    }

    fn name(&self) -> &str {
        "mesh"
    }
}

/// Möller–Trumbore test of the segment `start + t·dir`, `t ∈ (0, 1]`.
/// Returns the hit parameter `t`. Edges are inclusive, so a hit on a
/// shared edge is reported by every triangle touching it.
fn segment_triangle_hit(start: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-14 {
        return None; // Parallel or degenerate
    }
    let inv_det = 1.0 / det;

    let s = start - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    in_segment(t).then_some(t)
}

/// Closest point to `p` on triangle `abc` (Ericson, Real-Time Collision
/// Detection §5.1.5).
fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    // Inside the face region.
    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

/// Generates a closed UV sphere surface.
///
/// Pole rows collapse to single vertices so the mesh is watertight and
/// parity counts stay exact away from edges.
///
/// # Arguments
/// - `center`: Sphere center.
/// - `radius`: Sphere radius.
/// - `stacks`: Latitude divisions (at least 2).
/// - `slices`: Longitude divisions (at least 3).
pub fn uv_sphere(center: Vec3, radius: f64, stacks: usize, slices: usize) -> StrandResult<MeshSurface> {
    if stacks < 2 || slices < 3 {
        return Err(StrandError::InvalidSurface(format!(
            "UV sphere needs stacks >= 2 and slices >= 3 (got {stacks}, {slices})"
        )));
    }

    let ring_count = stacks - 1;
    let mut positions = Vec::with_capacity(2 + ring_count * slices);
    let mut triangles = Vec::with_capacity(2 * stacks * slices);

    positions.push(center + Vec3::Y * radius);
    for i in 1..stacks {
        let phi = std::f64::consts::PI * i as f64 / stacks as f64;
        for j in 0..slices {
            let theta = std::f64::consts::TAU * j as f64 / slices as f64;
            let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            positions.push(center + dir * radius);
        }
    }
    positions.push(center - Vec3::Y * radius);

    let top = 0u32;
    let bottom = (positions.len() - 1) as u32;
    let ring = |i: usize, j: usize| (1 + i * slices + j % slices) as u32;

    for j in 0..slices {
        triangles.push([top, ring(0, j + 1), ring(0, j)]);
    }
    for i in 0..ring_count - 1 {
        for j in 0..slices {
            let a = ring(i, j);
            let b = ring(i + 1, j);
            triangles.push([a, ring(i, j + 1), b]);
            triangles.push([ring(i, j + 1), ring(i + 1, j + 1), b]);
        }
    }
    for j in 0..slices {
        triangles.push([bottom, ring(ring_count - 1, j), ring(ring_count - 1, j + 1)]);
    }

    MeshSurface::new(positions, triangles)
}
