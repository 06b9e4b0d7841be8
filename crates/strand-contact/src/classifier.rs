//! Ray-parity inside/outside classification of guide vertices.
//!
//! The root is taken to be outside the surface. Walking the polyline from
//! the root, every segment with an odd number of surface crossings flips
//! the inside/outside state, and each segment's end vertex inherits the
//! current state. Inside vertices get their nearest surface point and the
//! unit direction towards it, both in the guide's local frame.

use tracing::{debug, trace};

use strand_guide::{CollisionInfo, SelectedGuide};
use strand_types::constants::DEFAULT_ROOT_OFFSET;

use crate::surface::SurfaceQuery;

/// Summary of one classification pass over a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyReport {
    /// Guides classified.
    pub guides: usize,
    /// Guides skipped as degenerate.
    pub skipped: usize,
    /// Colliding vertices over all guides.
    pub colliding: usize,
    /// Inside vertices whose closest surface point could not be resolved.
    pub unresolved: usize,
}

/// Inside/outside classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionClassifier {
    /// Distance the root is nudged along its surface normal before the
    /// first ray is cast, so the root never intersects its own surface.
    pub root_offset: f64,
}

impl Default for CollisionClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_OFFSET)
    }
}

impl CollisionClassifier {
    /// Creates a classifier with the given root offset.
    pub fn new(root_offset: f64) -> Self {
        Self { root_offset }
    }

    /// Classifies every vertex of one guide and returns its colliding count.
    ///
    /// Degenerate guides have their records cleared and report zero.
    pub fn classify(&self, guide: &mut SelectedGuide, surface: &dyn SurfaceQuery) -> usize {
        self.classify_counting(guide, surface).0
    }

    /// Classifies every guide in the selection.
    pub fn classify_selection(
        &self,
        guides: &mut [SelectedGuide],
        surface: &dyn SurfaceQuery,
    ) -> ClassifyReport {
        let mut report = ClassifyReport::default();
        for guide in guides.iter_mut() {
            if guide.curve.is_degenerate() {
                guide.curve.clear_collisions();
                report.skipped += 1;
                continue;
            }
            let (colliding, unresolved) = self.classify_counting(guide, surface);
            report.guides += 1;
            report.colliding += colliding;
            report.unresolved += unresolved;
        }
        debug!(
            surface = surface.name(),
            guides = report.guides,
            skipped = report.skipped,
            colliding = report.colliding,
            "Collision pass complete"
        );
        report
    }

    fn classify_counting(
        &self,
        guide: &mut SelectedGuide,
        surface: &dyn SurfaceQuery,
    ) -> (usize, usize) {
        let curve = &mut guide.curve;
        curve.clear_collisions();
        if curve.is_degenerate() {
            return (0, 0);
        }

        let position = &guide.position;
        let mut inside = false;
        let mut colliding = 0;
        let mut unresolved = 0;
        let mut start = position.to_world(curve.vertices[0]) + position.normal * self.root_offset;

        for i in 1..curve.vertices.len() {
            let local = curve.vertices[i];
            let end = position.to_world(local);

            if surface.intersections_along_segment(start, end - start) % 2 == 1 {
                inside = !inside;
            }

            if inside {
                match surface.closest_point(end) {
                    Some(closest) => {
                        curve.collisions[i] =
                            CollisionInfo::colliding(local, position.to_local(closest));
                        colliding += 1;
                    }
                    None => {
                        trace!(guide = guide.id.0, vertex = i, "Closest point unresolved");
                        unresolved += 1;
                    }
                }
            }

            start = end;
        }

        curve.colliding_count = colliding;
        (colliding, unresolved)
    }
}
