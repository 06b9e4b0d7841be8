//! CLI command implementations.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use strand_bench::metrics::BenchmarkMetrics;
use strand_bench::runner::BenchmarkRunner;
use strand_bench::scenarios::{Scenario, ScenarioKind};
use strand_brush::{BrushKind, BrushTask, BrushTaskScheduler, EnqueueOutcome, GroomProcessor, WorkerState};
use strand_contact::mesh::uv_sphere;
use strand_contact::{PlaneSurface, SurfaceQuery};
use strand_guide::generators::{plane_guides, sphere_guides, straight_guide};
use strand_math::Vec3;
use strand_solver::{ConstraintSolver, SolveStatus, SolverConfig};
use strand_telemetry::{EventBus, EventKind, VecSink};

use crate::{BrushArg, SurfaceArg};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load_config(path: Option<&str>) -> Result<SolverConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => SolverConfig::load(path)
            .map_err(|e| format!("Failed to load config '{path}': {e}").into()),
        None => Ok(SolverConfig::default()),
    }
}

/// Stream a brush stroke through the scheduler and report the result.
pub fn stroke(
    surface: SurfaceArg,
    brush: BrushArg,
    delta: &[f64],
    samples: u32,
    config_path: Option<&str>,
) -> CliResult {
    println!("Strand Brush Stroke");
    println!("═══════════════════");
    println!();

    let config = load_config(config_path)?;
    let [dx, dy, dz] = delta else {
        return Err("--delta expects three components".into());
    };
    let displacement = Vec3::new(*dx, *dy, *dz);

    let (guides, query) = match surface {
        SurfaceArg::Sphere => {
            let mesh: Arc<dyn SurfaceQuery> = Arc::new(uv_sphere(Vec3::ZERO, 1.0, 24, 32)?);
            (sphere_guides(Vec3::ZERO, 1.0, 8, 16, 12, 0.03), mesh)
        }
        SurfaceArg::Plane => {
            let plane: Arc<dyn SurfaceQuery> = Arc::new(PlaneSurface::ground(0.0));
            (plane_guides(0.0, 12, 0.05, 10, 0.02), plane)
        }
    };
    let brush = match brush {
        BrushArg::Translate => BrushKind::Translate,
        BrushArg::Rotate => BrushKind::Rotate,
    };

    println!("Surface:   {}", query.name());
    println!("Brush:     {}", brush.mode().name());
    println!("Guides:    {}", guides.len());
    println!("Samples:   {samples} × {displacement}");
    println!("Threads:   {}", config.thread_count);
    println!();

    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    let selection = Arc::new(Mutex::new(guides));
    let processor = Arc::new(
        GroomProcessor::new(Arc::clone(&selection), Some(query), brush.mode(), &config)?
            .with_telemetry(bus.emitter()),
    );
    let scheduler = BrushTaskScheduler::with_telemetry(processor.clone(), bus.emitter());

    let start = Instant::now();
    let mut dropped = 0;
    for _ in 0..samples {
        if scheduler.enqueue(BrushTask::new(displacement, 1.0 / 60.0))? == EnqueueOutcome::Dropped {
            dropped += 1;
        }
        thread::sleep(Duration::from_millis(2));
    }
    while scheduler.queued_len() > 0 || scheduler.state() == WorkerState::Running {
        thread::sleep(Duration::from_millis(10));
    }
    let elapsed = start.elapsed().as_secs_f64();
    bus.finalize();

    let events = sink.events();
    let steps = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::TaskCoalesced { .. }))
        .count();
    let clamped = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::TaskCoalesced { clamped: true, .. }))
        .count();

    println!("Coalesced steps:  {steps} ({clamped} clamped, {dropped} dropped)");
    println!("Elapsed:          {elapsed:.3}s (includes worker idle timeout)");
    if let Some(batch) = processor.last_batch() {
        println!(
            "Last batch:       {} converged, {} capped, {} singular, {:.3}ms",
            batch.converged,
            batch.iteration_cap,
            batch.singular,
            batch.wall_time * 1000.0
        );
    }

    let guides = selection.lock().map_err(|_| "Guide selection lock poisoned")?;
    let max_error = guides
        .iter()
        .map(|g| g.curve.max_length_error() / g.curve.segment_length)
        .fold(0.0, f64::max);
    let colliding: usize = guides.iter().map(|g| g.curve.colliding_count).sum();
    println!("Max length error: {max_error:.3e} (relative)");
    println!("Still colliding:  {colliding} vertices");

    Ok(())
}

/// Relax perturbed strands in lightweight mode.
pub fn relax(strands: usize, vertices: usize, jitter: f64) -> CliResult {
    println!("Strand Relaxation");
    println!("═════════════════");
    println!();

    if vertices < 2 {
        return Err("--vertices must be at least 2".into());
    }

    let segment_length = 0.02;
    let solver = ConstraintSolver::new();
    let mut converged = 0;
    let mut singular = 0;
    let mut iterations = 0u64;
    let mut max_error = 0.0_f64;

    let start = Instant::now();
    for k in 0..strands {
        let mut curve = straight_guide(vertices, segment_length);
        let seed = 0.1 + 0.037 * k as f64;
        for i in 1..vertices {
            let t = i as f64 * seed;
            let dir = Vec3::new(0.4 * t.sin(), 1.0, 0.3 * (1.7 * t).cos()).normalize();
            let len = segment_length * (1.0 + jitter * (2.3 * t).sin());
            curve.vertices[i] = curve.vertices[i - 1] + dir * len;
        }

        let report = solver.solve_vertices(&mut curve.vertices, segment_length);
        iterations += u64::from(report.iterations);
        match report.status {
            SolveStatus::Converged => converged += 1,
            SolveStatus::Singular => singular += 1,
            _ => {}
        }
        max_error = max_error.max(curve.max_length_error() / segment_length);
    }
    let elapsed = start.elapsed().as_secs_f64();

    println!("Strands:          {strands} × {vertices} vertices");
    println!("Converged:        {converged}");
    println!("Singular:         {singular}");
    if strands > 0 {
        println!("Avg iterations:   {:.2}", iterations as f64 / strands as f64);
    }
    println!("Max length error: {max_error:.3e} (relative)");
    println!("Wall time:        {:.3}ms", elapsed * 1000.0);

    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(scenario_name: &str, output_path: Option<&str>) -> CliResult {
    println!("Strand Benchmark Suite");
    println!("══════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                eprintln!("Unknown scenario: {scenario_name}");
                eprintln!("Available: sphere_comb, plane_push, relax, all");
                return Err("Unknown scenario".into());
            }
        }
    };

    let mut all_metrics = Vec::new();

    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind)?;
        println!(
            "Running: {} ({} guides, {} verts, {} steps)",
            kind.name(),
            scenario.guides.len(),
            scenario.vertex_count(),
            scenario.steps,
        );

        let metrics =
            BenchmarkRunner::run(scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Avg iters:     {:.2}", metrics.avg_iterations);
        println!("  Converged:     {:.1}%", metrics.converged_fraction * 100.0);
        println!("  Length error:  {:.3e}", metrics.max_length_error);
        println!();

        all_metrics.push(metrics);
    }

    if let Some(path) = output_path {
        let csv = BenchmarkMetrics::to_csv(&all_metrics);
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{}", BenchmarkMetrics::to_csv(&all_metrics));
    }

    Ok(())
}
