//! Benchmark scenarios: procedural guides, surface and stroke for each case.
//!
//! Three canonical scenarios:
//! 1. **Sphere comb**: guides on a sphere combed sideways and down into it
//! 2. **Plane push**: a guide grid pushed through a ground plane
//! 3. **Relax**: perturbed strands restored in lightweight mode

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use strand_brush::BrushKind;
use strand_contact::mesh::uv_sphere;
use strand_contact::{PlaneSurface, SurfaceQuery};
use strand_guide::generators::{plane_guides, sphere_guides};
use strand_guide::SelectedGuides;
use strand_math::Vec3;
use strand_solver::SolverConfig;
use strand_types::StrandResult;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Guides on a sphere combed into the surface.
    SphereComb,
    /// Guide grid pushed through a ground plane.
    PlanePush,
    /// Lightweight-mode relaxation of perturbed strands.
    Relax,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::SphereComb,
            ScenarioKind::PlanePush,
            ScenarioKind::Relax,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::SphereComb => "sphere_comb",
            ScenarioKind::PlanePush => "plane_push",
            ScenarioKind::Relax => "relax",
        }
    }

    /// Parses a scenario name as produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Guides to groom.
    pub guides: SelectedGuides,
    /// Query surface, if collisions are part of the scenario.
    pub surface: Option<Arc<dyn SurfaceQuery>>,
    /// Brush applied each step.
    pub brush: BrushKind,
    /// World-space displacement applied each step.
    pub stroke: Vec3,
    /// Number of brush steps.
    pub steps: u32,
    /// Solver configuration.
    pub config: SolverConfig,
}

impl Scenario {
    /// Sphere comb: 8 rings × 16 guides of 12 vertices on a faceted unit
    /// sphere, rotated down and sideways over 30 steps.
    pub fn sphere_comb() -> StrandResult<Self> {
        let surface = uv_sphere(Vec3::ZERO, 1.0, 24, 32)?;
        Ok(Self {
            kind: ScenarioKind::SphereComb,
            guides: sphere_guides(Vec3::ZERO, 1.0, 8, 16, 12, 0.03),
            surface: Some(Arc::new(surface)),
            brush: BrushKind::Rotate,
            stroke: Vec3::new(0.02, -0.01, 0.0),
            steps: 30,
            config: SolverConfig::default(),
        })
    }

    /// Plane push: a 12 × 12 grid of 10-vertex guides translated through
    /// the ground plane over 20 steps.
    pub fn plane_push() -> Self {
        Self {
            kind: ScenarioKind::PlanePush,
            guides: plane_guides(0.0, 12, 0.05, 10, 0.02),
            surface: Some(Arc::new(PlaneSurface::ground(0.0))),
            brush: BrushKind::Translate,
            stroke: Vec3::new(0.004, -0.01, 0.0),
            steps: 20,
            config: SolverConfig::default(),
        }
    }

    /// Relax: 256 wavy 16-vertex strands with ±20% segment error, solved
    /// once in lightweight mode per step.
    pub fn relax() -> Self {
        let mut guides = plane_guides(0.0, 16, 0.05, 16, 0.02);
        for (k, guide) in guides.iter_mut().enumerate() {
            let seed = 0.1 + 0.013 * k as f64;
            let vertices = &mut guide.curve.vertices;
            for i in 1..vertices.len() {
                let t = i as f64 * seed;
                let dir = Vec3::new(0.4 * t.sin(), 1.0, 0.3 * (1.7 * t).cos()).normalize();
                let len = 0.02 * (1.0 + 0.2 * (2.3 * t).sin());
                vertices[i] = vertices[i - 1] + dir * len;
            }
        }
        Self {
            kind: ScenarioKind::Relax,
            guides,
            surface: None,
            brush: BrushKind::Translate,
            stroke: Vec3::ZERO,
            steps: 1,
            config: SolverConfig::without_collisions(),
        }
    }

    /// Creates a scenario from its kind.
    pub fn from_kind(kind: ScenarioKind) -> StrandResult<Self> {
        match kind {
            ScenarioKind::SphereComb => Self::sphere_comb(),
            ScenarioKind::PlanePush => Ok(Self::plane_push()),
            ScenarioKind::Relax => Ok(Self::relax()),
        }
    }

    /// Total vertex count over all guides.
    pub fn vertex_count(&self) -> usize {
        self.guides.iter().map(|g| g.curve.vertex_count()).sum()
    }
}
