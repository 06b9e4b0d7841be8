//! The active brush selection.

use serde::{Deserialize, Serialize};
use strand_types::GuideId;

use crate::guide::GuideCurve;
use crate::position::GuidePosition;

/// One selected guide: its curve, root frame and brush falloff weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedGuide {
    /// Identifier in the guide storage.
    pub id: GuideId,
    /// Root frame.
    pub position: GuidePosition,
    /// Curve in local space.
    pub curve: GuideCurve,
    /// Brush falloff weight in `[0, 1]`.
    pub weight: f64,
}

impl SelectedGuide {
    /// Creates a fully weighted selection entry.
    pub fn new(id: GuideId, position: GuidePosition, curve: GuideCurve) -> Self {
        Self {
            id,
            position,
            curve,
            weight: 1.0,
        }
    }

    /// Sets the brush falloff weight, clamped to `[0, 1]`.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.clamp(0.0, 1.0);
        self
    }
}

/// Selection of guides handed to the classifier and solver.
pub type SelectedGuides = Vec<SelectedGuide>;
