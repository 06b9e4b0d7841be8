//! Benchmark metrics: data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Number of guides.
    pub guide_count: usize,
    /// Total vertex count.
    pub vertex_count: usize,
    /// Brush steps executed.
    pub steps: u32,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per step (seconds).
    pub avg_step_time: f64,
    /// Minimum step time.
    pub min_step_time: f64,
    /// Maximum step time.
    pub max_step_time: f64,
    /// Average solver iterations per guide solve.
    pub avg_iterations: f64,
    /// Fraction of guide solves that converged.
    pub converged_fraction: f64,
    /// Guide solves aborted on a singular system.
    pub singular_solves: usize,
    /// Largest segment length error at the end, relative to rest length.
    pub max_length_error: f64,
    /// Colliding vertices remaining at the end.
    pub final_colliding: usize,
}

impl BenchmarkMetrics {
    /// CSV header row.
    pub fn to_csv_header() -> String {
        "scenario,guides,vertices,steps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,avg_iterations,converged_fraction,singular,max_length_error,final_colliding".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.2},{:.4},{},{:.3e},{}",
            self.scenario,
            self.guide_count,
            self.vertex_count,
            self.steps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.avg_iterations,
            self.converged_fraction,
            self.singular_solves,
            self.max_length_error,
            self.final_colliding,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
