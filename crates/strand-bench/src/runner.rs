//! Benchmark runner: executes scenarios and collects metrics.
//!
//! Brush scenarios run their steps synchronously through a
//! [`GroomProcessor`] so step times measure brush, collision pass and
//! solve without scheduler latency.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tracing::info;

use strand_brush::{BrushTask, GroomProcessor};
use strand_guide::SelectedGuides;
use strand_solver::{ConstraintSolver, SolveReport, SolveStatus};
use strand_types::StrandResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Time step attached to benchmark brush tasks (60 Hz drag samples).
const STEP_DT: f64 = 1.0 / 60.0;

#[derive(Default)]
struct SolveTally {
    solves: usize,
    iterations: u64,
    converged: usize,
    singular: usize,
}

impl SolveTally {
    fn add(&mut self, report: &SolveReport) {
        if report.status == SolveStatus::Skipped {
            return;
        }
        self.solves += 1;
        self.iterations += u64::from(report.iterations);
        match report.status {
            SolveStatus::Converged => self.converged += 1,
            SolveStatus::Singular => self.singular += 1,
            _ => {}
        }
    }
}

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario.
    pub fn run(scenario: Scenario) -> StrandResult<BenchmarkMetrics> {
        let kind = scenario.kind;
        let guide_count = scenario.guides.len();
        let vertex_count = scenario.vertex_count();
        let steps = scenario.steps;

        let selection = Arc::new(Mutex::new(scenario.guides));
        let mut step_times: Vec<f64> = Vec::with_capacity(steps as usize);
        let mut tally = SolveTally::default();

        let total_start = Instant::now();

        if kind == ScenarioKind::Relax {
            let solver = ConstraintSolver::new();
            for _ in 0..steps {
                let start = Instant::now();
                let mut guides = selection.lock().unwrap_or_else(PoisonError::into_inner);
                for guide in guides.iter_mut() {
                    let length = guide.curve.segment_length;
                    tally.add(&solver.solve_vertices(&mut guide.curve.vertices, length));
                }
                step_times.push(start.elapsed().as_secs_f64());
            }
        } else {
            let processor = GroomProcessor::new(
                Arc::clone(&selection),
                scenario.surface.clone(),
                scenario.brush.mode(),
                &scenario.config,
            )?;
            for step in 0..steps {
                let start = Instant::now();
                let batch =
                    processor.step(&BrushTask::new(scenario.stroke, STEP_DT), u64::from(step) + 1);
                step_times.push(start.elapsed().as_secs_f64());
                batch.reports.iter().for_each(|r| tally.add(r));
            }
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();

        let guides = selection.lock().unwrap_or_else(PoisonError::into_inner);
        let (max_length_error, final_colliding) = final_state(&guides);

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);
        let (avg_iterations, converged_fraction) = if tally.solves > 0 {
            (
                tally.iterations as f64 / tally.solves as f64,
                tally.converged as f64 / tally.solves as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let metrics = BenchmarkMetrics {
            scenario: kind.name().to_string(),
            guide_count,
            vertex_count,
            steps,
            total_wall_time,
            avg_step_time: avg_step,
            min_step_time: if step_times.is_empty() { 0.0 } else { min_step },
            max_step_time: max_step,
            avg_iterations,
            converged_fraction,
            singular_solves: tally.singular,
            max_length_error,
            final_colliding,
        };
        info!(
            scenario = %metrics.scenario,
            guides = guide_count,
            avg_step_ms = metrics.avg_step_time * 1000.0,
            converged_fraction,
            "Benchmark scenario complete"
        );
        Ok(metrics)
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all() -> StrandResult<Vec<BenchmarkMetrics>> {
        let mut results = Vec::new();
        for &kind in ScenarioKind::all() {
            results.push(Self::run(Scenario::from_kind(kind)?)?);
        }
        Ok(results)
    }
}

/// Largest relative length error and remaining colliding vertices.
fn final_state(guides: &SelectedGuides) -> (f64, usize) {
    let mut max_error = 0.0_f64;
    let mut colliding = 0;
    for guide in guides.iter().filter(|g| !g.curve.is_degenerate()) {
        max_error = max_error.max(guide.curve.max_length_error() / guide.curve.segment_length);
        colliding += guide.curve.colliding_count;
    }
    (max_error, colliding)
}
