//! Iterative constraint projection.
//!
//! Each iteration evaluates the constraint vector `C`, stops once
//! `max |C| ≤ CONVERGENCE_THRESHOLD` or after `MAX_LOOP_ITERATIONS`
//! corrections, and otherwise solves `(NC·NCᵗ)·λ = C` and applies
//! `dX = −NCᵗ·λ` to the non-root vertices.
//!
//! Positions are divided by the rest segment length before iterating so
//! every segment targets unit length, and multiplied back afterwards.
//! Work happens on a scaled copy: the guide only ever receives finished,
//! finite, unscaled positions, and its root is never written.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use strand_guide::{CollisionInfo, GuideCurve};
use strand_math::Vec3;
use strand_types::constants::{CONVERGENCE_THRESHOLD, EPSILON, MAX_LOOP_ITERATIONS};

use crate::constraint_set::{CollisionRow, ConstraintSet};

/// How a guide solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Residual fell below the convergence threshold.
    Converged,
    /// Iteration cap reached; the guide holds the best approximation.
    IterationCap,
    /// The Gram system could not be solved; the guide holds the positions
    /// reached before the failing iteration.
    Singular,
    /// Degenerate guide (fewer than two vertices, zero rest length or
    /// non-finite input); left untouched.
    Skipped,
}

/// Outcome of solving one guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Corrections applied.
    pub iterations: u32,
    /// `max |C|` at exit, in unit-length space.
    pub residual: f64,
    /// Exit reason.
    pub status: SolveStatus,
    /// Interpenetration rows at the start of the solve.
    pub initial_colliding: usize,
    /// Interpenetration rows at exit.
    pub final_colliding: usize,
    /// Interpenetration row count after each correction.
    pub colliding_trace: Vec<usize>,
}

impl SolveReport {
    fn skipped() -> Self {
        Self {
            iterations: 0,
            residual: 0.0,
            status: SolveStatus::Skipped,
            initial_colliding: 0,
            final_colliding: 0,
            colliding_trace: Vec::new(),
        }
    }

    /// True if the constraints were satisfied to threshold.
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Lagrange-multiplier constraint solver.
///
/// Stateless; buffers are allocated per solve call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintSolver;

impl ConstraintSolver {
    /// Creates a solver.
    pub fn new() -> Self {
        Self
    }

    /// Full mode: inextensibility plus one interpenetration row per
    /// colliding vertex of `curve`.
    ///
    /// Vertices that leave the surface during the solve have their
    /// collision record cleared; no record is ever set.
    pub fn solve_guide(&self, curve: &mut GuideCurve) -> SolveReport {
        if curve.is_degenerate() || !curve.is_finite() {
            return SolveReport::skipped();
        }
        if curve.collisions.len() != curve.vertices.len() {
            curve.clear_collisions();
        }

        let inv_len = 1.0 / curve.segment_length;
        let rows = curve
            .collisions
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, c)| c.is_colliding)
            .map(|(vertex, c)| CollisionRow {
                vertex,
                point: c.closest_surface_point * inv_len,
                direction: c.surface_direction,
            })
            .filter(|r| r.direction.is_finite() && r.direction != Vec3::ZERO);

        let mut set = ConstraintSet::new(curve.vertices.len());
        set.set_collisions(rows);

        let report = project(&mut curve.vertices, curve.segment_length, &mut set);

        // Clear every record the solve no longer treats as colliding.
        let active: Vec<usize> = set.collisions().iter().map(|r| r.vertex).collect();
        for (i, info) in curve.collisions.iter_mut().enumerate() {
            if info.is_colliding && !active.contains(&i) {
                *info = CollisionInfo::default();
            }
        }
        curve.recount_collisions();

        report
    }

    /// Lightweight mode: inextensibility only, on an arbitrary vertex
    /// sequence with rest segment length `segment_length`.
    pub fn solve_vertices(&self, vertices: &mut [Vec3], segment_length: f64) -> SolveReport {
        if vertices.len() < 2
            || segment_length <= EPSILON
            || !segment_length.is_finite()
            || vertices.iter().any(|v| !v.is_finite())
        {
            return SolveReport::skipped();
        }
        let mut set = ConstraintSet::new(vertices.len());
        project(vertices, segment_length, &mut set)
    }
}

/// Shared iteration of both modes.
fn project(vertices: &mut [Vec3], segment_length: f64, set: &mut ConstraintSet) -> SolveReport {
    let inv_len = 1.0 / segment_length;
    let mut scaled: Vec<Vec3> = vertices.iter().map(|v| *v * inv_len).collect();

    let initial_colliding = set.colliding_count();
    let mut colliding_trace = Vec::new();
    let mut iterations = 0u32;
    let mut moved = false;

    let (status, residual) = loop {
        let residual = set.evaluate(&scaled);
        if residual <= CONVERGENCE_THRESHOLD {
            break (SolveStatus::Converged, residual);
        }
        if iterations >= MAX_LOOP_ITERATIONS {
            break (SolveStatus::IterationCap, residual);
        }

        set.evaluate_jacobian(&scaled);
        if !set.solve_multipliers().is_solved() {
            warn!(iteration = iterations, residual, "Singular constraint system; keeping best positions");
            break (SolveStatus::Singular, residual);
        }
        if !set.apply_correction(&mut scaled) {
            warn!(iteration = iterations, "Non-finite correction; keeping best positions");
            break (SolveStatus::Singular, residual);
        }
        moved = true;

        if set.colliding_count() > 0 {
            // Still behind the surface while the row value is negative.
            let exited = set.retain_collisions(|row| row.value(scaled[row.vertex]) < 0.0);
            if !exited.is_empty() {
                trace!(?exited, remaining = set.colliding_count(), "Vertices left the surface");
            }
        }
        colliding_trace.push(set.colliding_count());

        iterations += 1;
    };

    if moved {
        for (v, s) in vertices.iter_mut().zip(&scaled).skip(1) {
            *v = *s * segment_length;
        }
    }

    SolveReport {
        iterations,
        residual,
        status,
        initial_colliding,
        final_colliding: set.colliding_count(),
        colliding_trace,
    }
}
