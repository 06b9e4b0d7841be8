//! Brush drag sample.

use serde::{Deserialize, Serialize};
use strand_math::Vec3;

/// One brush drag sample, immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushTask {
    displacement: Vec3,
    delta_time: f64,
}

impl BrushTask {
    /// Creates a task from a world-space displacement and its time step.
    pub fn new(displacement: Vec3, delta_time: f64) -> Self {
        Self {
            displacement,
            delta_time,
        }
    }

    /// World-space brush displacement.
    #[inline]
    pub fn displacement(&self) -> Vec3 {
        self.displacement
    }

    /// Time step the displacement was sampled over (seconds).
    #[inline]
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }
}
