//! Brush modes: how a coalesced displacement reshapes a selected guide
//! before collisions and constraints are resolved.

use serde::{Deserialize, Serialize};
use strand_guide::SelectedGuide;
use strand_math::{Quat, Vec3};
use strand_types::constants::EPSILON;

/// A brush applied to every guide of the selection.
pub trait BrushMode: Send + Sync {
    /// Applies a world-space `displacement` to `guide` (local vertices).
    fn apply(&self, guide: &mut SelectedGuide, displacement: Vec3, delta_time: f64);

    /// Returns the brush name.
    fn name(&self) -> &str;
}

/// Built-in brush modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushKind {
    /// [`TranslateBrush`].
    #[default]
    Translate,
    /// [`RotateBrush`].
    Rotate,
}

impl BrushKind {
    /// Boxed brush for this kind.
    pub fn mode(self) -> Box<dyn BrushMode> {
        match self {
            BrushKind::Translate => Box::new(TranslateBrush),
            BrushKind::Rotate => Box::new(RotateBrush),
        }
    }
}

/// Moves every non-root vertex by the displacement, scaled by the
/// guide's selection weight. The solver then pulls the guide back to
/// its rest lengths, which drags the strand along the stroke.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateBrush;

impl BrushMode for TranslateBrush {
    fn apply(&self, guide: &mut SelectedGuide, displacement: Vec3, _delta_time: f64) {
        let offset = guide.position.vector_to_local(displacement) * guide.weight;
        for v in guide.curve.vertices.iter_mut().skip(1) {
            *v += offset;
        }
    }

    fn name(&self) -> &str {
        "translate"
    }
}

/// Swings each guide about its root.
///
/// The rotation axis is `normal × displacement` and the angle is the
/// weighted displacement length divided by the guide's rest length, so a
/// stroke moves the tip by roughly the stroke distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotateBrush;

impl BrushMode for RotateBrush {
    fn apply(&self, guide: &mut SelectedGuide, displacement: Vec3, _delta_time: f64) {
        let rest_length = guide.curve.rest_length();
        if rest_length <= EPSILON {
            return;
        }
        let axis = guide.position.normal.cross(displacement);
        let local_axis = guide.position.vector_to_local(axis);
        if local_axis.length_squared() <= EPSILON * EPSILON {
            return;
        }

        let angle = displacement.length() * guide.weight / rest_length;
        let rotation = Quat::from_axis_angle(local_axis.normalize(), angle);
        let Some(root) = guide.curve.root() else {
            return;
        };
        for v in guide.curve.vertices.iter_mut().skip(1) {
            *v = root + rotation * (*v - root);
        }
    }

    fn name(&self) -> &str {
        "rotate"
    }
}
