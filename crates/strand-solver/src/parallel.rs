//! Parallel full-mode solving over a guide selection.
//!
//! Guides share no mutable state, so each is solved independently on a
//! dedicated rayon pool sized by [`SolverConfig::thread_count`]. The pool
//! is owned by the solver, so the global rayon pool and its thread count
//! are never touched.
//!
//! Small selections fall back to a sequential loop on the calling thread
//! to avoid the fan-out overhead.

use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use strand_guide::SelectedGuide;
use strand_types::{StrandError, StrandResult};

use crate::config::SolverConfig;
use crate::solver::{ConstraintSolver, SolveReport, SolveStatus};

/// Selections smaller than this are solved sequentially.
pub const MIN_GUIDES_FOR_PARALLEL: usize = 2;

/// Aggregate of one batch solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-guide reports, in selection order.
    pub reports: Vec<SolveReport>,
    /// Guides that converged.
    pub converged: usize,
    /// Guides that hit the iteration cap.
    pub iteration_cap: usize,
    /// Guides aborted on a singular system.
    pub singular: usize,
    /// Degenerate guides left untouched.
    pub skipped: usize,
    /// Largest exit residual over all solved guides.
    pub max_residual: f64,
    /// Sum of iterations over all guides.
    pub total_iterations: u64,
    /// Wall-clock time of the batch (seconds).
    pub wall_time: f64,
}

impl BatchReport {
    fn from_reports(reports: Vec<SolveReport>, wall_time: f64) -> Self {
        let mut batch = Self {
            wall_time,
            ..Default::default()
        };
        for r in &reports {
            match r.status {
                SolveStatus::Converged => batch.converged += 1,
                SolveStatus::IterationCap => batch.iteration_cap += 1,
                SolveStatus::Singular => batch.singular += 1,
                SolveStatus::Skipped => batch.skipped += 1,
            }
            batch.max_residual = batch.max_residual.max(r.residual);
            batch.total_iterations += u64::from(r.iterations);
        }
        batch.reports = reports;
        batch
    }

    /// Number of guides in the batch.
    pub fn guide_count(&self) -> usize {
        self.reports.len()
    }
}

/// Full-mode solver fanned out over a bounded thread pool.
pub struct ParallelSolver {
    solver: ConstraintSolver,
    pool: ThreadPool,
    thread_count: usize,
}

impl ParallelSolver {
    /// Builds the pool described by `config`.
    pub fn new(config: &SolverConfig) -> StrandResult<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .thread_name(|i| format!("strand-solve-{i}"))
            .build()
            .map_err(|e| StrandError::ThreadPool(e.to_string()))?;
        Ok(Self {
            solver: ConstraintSolver::new(),
            pool,
            thread_count: config.thread_count,
        })
    }

    /// Worker threads in the pool.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Solves every guide of the selection in full mode.
    ///
    /// A singular or degenerate guide only affects its own report.
    pub fn solve_selection(&self, guides: &mut [SelectedGuide]) -> BatchReport {
        let start = Instant::now();
        let solver = self.solver;

        let reports: Vec<SolveReport> =
            if self.thread_count <= 1 || guides.len() < MIN_GUIDES_FOR_PARALLEL {
                guides
                    .iter_mut()
                    .map(|g| solver.solve_guide(&mut g.curve))
                    .collect()
            } else {
                self.pool.install(|| {
                    guides
                        .par_iter_mut()
                        .map(|g| solver.solve_guide(&mut g.curve))
                        .collect()
                })
            };

        let batch = BatchReport::from_reports(reports, start.elapsed().as_secs_f64());
        debug!(
            guides = batch.guide_count(),
            converged = batch.converged,
            iteration_cap = batch.iteration_cap,
            singular = batch.singular,
            skipped = batch.skipped,
            max_residual = batch.max_residual,
            "Batch solved"
        );
        batch
    }
}
