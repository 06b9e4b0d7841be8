//! Guide curve: a root-anchored polyline.
//!
//! Vertex 0 is the root and is never moved by the solver. Positions and
//! collision records are stored in the guide's local frame.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;
use strand_types::constants::EPSILON;
use strand_types::{StrandError, StrandResult};

use crate::collision::CollisionInfo;

/// An ordered polyline approximating one strand's centerline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideCurve {
    /// Vertex positions (local space). Index 0 is the root.
    pub vertices: Vec<Vec3>,
    /// Rest length of every segment.
    pub segment_length: f64,
    /// Per-vertex collision records, parallel to `vertices`.
    pub collisions: Vec<CollisionInfo>,
    /// Number of records currently flagged as colliding.
    pub colliding_count: usize,
}

impl GuideCurve {
    /// Creates a guide with cleared collision records.
    pub fn new(vertices: Vec<Vec3>, segment_length: f64) -> Self {
        let n = vertices.len();
        Self {
            vertices,
            segment_length,
            collisions: vec![CollisionInfo::default(); n],
            colliding_count: 0,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Root vertex position, if any.
    #[inline]
    pub fn root(&self) -> Option<Vec3> {
        self.vertices.first().copied()
    }

    /// True for guides the classifier and solver skip: fewer than two
    /// vertices or a vanishing rest segment length.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 2 || self.segment_length <= EPSILON
    }

    /// Rest length of the whole guide.
    pub fn rest_length(&self) -> f64 {
        self.segment_length * self.segment_count() as f64
    }

    /// Resets every collision record and the colliding count.
    pub fn clear_collisions(&mut self) {
        self.collisions
            .resize(self.vertices.len(), CollisionInfo::default());
        for info in &mut self.collisions {
            info.clear();
        }
        self.colliding_count = 0;
    }

    /// Recomputes `colliding_count` from the collision flags.
    pub fn recount_collisions(&mut self) -> usize {
        self.colliding_count = self.collisions.iter().filter(|c| c.is_colliding).count();
        self.colliding_count
    }

    /// Largest deviation of any segment's length from the rest length.
    pub fn max_length_error(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|w| (w[1].distance(w[0]) - self.segment_length).abs())
            .fold(0.0, f64::max)
    }

    /// Returns true if every vertex coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.is_finite())
    }

    /// Validates guide integrity.
    ///
    /// Checks:
    /// - Collision records are parallel to the vertices
    /// - The root is never flagged as colliding
    /// - `colliding_count` matches the flags and is at most `vertex_count − 1`
    /// - All positions are finite
    pub fn validate(&self) -> StrandResult<()> {
        if self.collisions.len() != self.vertices.len() {
            return Err(StrandError::InvalidGuide(format!(
                "Collision records ({}) != vertex count ({})",
                self.collisions.len(),
                self.vertices.len()
            )));
        }
        if self.collisions.first().is_some_and(|c| c.is_colliding) {
            return Err(StrandError::InvalidGuide(
                "Root vertex is flagged as colliding".into(),
            ));
        }
        let flagged = self.collisions.iter().filter(|c| c.is_colliding).count();
        if flagged != self.colliding_count {
            return Err(StrandError::InvalidGuide(format!(
                "Colliding count ({}) != flagged vertices ({})",
                self.colliding_count, flagged
            )));
        }
        if self.colliding_count > self.segment_count() {
            return Err(StrandError::InvalidGuide(format!(
                "Colliding count ({}) exceeds segment count ({})",
                self.colliding_count,
                self.segment_count()
            )));
        }
        if !self.is_finite() {
            return Err(StrandError::InvalidGuide(
                "Guide contains non-finite positions".into(),
            ));
        }
        Ok(())
    }
}
