//! Integration tests for strand-brush.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use strand_brush::{
    BrushMode, BrushTask, BrushTaskScheduler, EnqueueOutcome, GroomProcessor, RotateBrush,
    TaskProcessor, TaskQueue, ThreadSpawner, TranslateBrush, WorkerJob, WorkerSpawner,
    WorkerState,
};
use strand_contact::{PlaneSurface, SurfaceQuery};
use strand_guide::generators::{plane_guides, straight_guide};
use strand_guide::{GuidePosition, SelectedGuide};
use strand_math::Vec3;
use strand_solver::SolverConfig;
use strand_telemetry::{EventBus, EventKind, VecSink};
use strand_types::constants::{MAX_IDLE_TIME, MAX_TASK_QUEUE_SIZE};
use strand_types::{GuideId, StrandError};

fn task(x: f64, y: f64, z: f64) -> BrushTask {
    BrushTask::new(Vec3::new(x, y, z), 0.016)
}

/// Records every processed task.
#[derive(Default)]
struct Recorder {
    steps: Mutex<Vec<(BrushTask, u64)>>,
    delay: Duration,
}

impl Recorder {
    fn with_delay(delay: Duration) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            delay,
        }
    }

    fn count(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

impl TaskProcessor for Recorder {
    fn process(&self, task: &BrushTask, sequence: u64) {
        thread::sleep(self.delay);
        self.steps.lock().unwrap().push((*task, sequence));
    }
}

/// Blocks inside `process` until the sender is dropped.
struct Gate {
    release: Mutex<mpsc::Receiver<()>>,
}

impl TaskProcessor for Gate {
    fn process(&self, _task: &BrushTask, _sequence: u64) {
        let _ = self.release.lock().unwrap().recv();
    }
}

/// Refuses the first `failures` spawn attempts, then starts real threads.
struct FlakySpawner {
    failures: usize,
    attempts: Arc<AtomicUsize>,
}

impl WorkerSpawner for FlakySpawner {
    fn spawn(&self, job: WorkerJob) -> io::Result<JoinHandle<()>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "no threads left"));
        }
        ThreadSpawner.spawn(job)
    }
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

// ─── TaskQueue Tests ──────────────────────────────────────────

#[test]
fn queue_drops_beyond_capacity() {
    let mut q = TaskQueue::new();
    for i in 0..MAX_TASK_QUEUE_SIZE {
        assert_eq!(q.push(task(i as f64, 0.0, 0.0)), EnqueueOutcome::Queued);
    }
    assert_eq!(q.push(task(-99.0, 0.0, 0.0)), EnqueueOutcome::Dropped);
    assert_eq!(q.len(), 50);
    assert!(q.iter().all(|t| t.displacement().x >= 0.0));
}

#[test]
fn opposite_directions_never_merge() {
    let mut q = TaskQueue::new();
    q.push(BrushTask::new(Vec3::new(0.1, 0.0, 0.0), 0.01));
    q.push(BrushTask::new(Vec3::new(0.1, 0.0, 0.0), 0.02));
    q.push(BrushTask::new(Vec3::new(-0.1, 0.0, 0.0), 0.03));

    let first = q.coalesce().unwrap();
    assert_eq!(first.merged, 2);
    assert!((first.task.displacement() - Vec3::new(0.2, 0.0, 0.0)).length() < 1e-15);
    assert!((first.task.delta_time() - 0.03).abs() < 1e-15);

    let second = q.coalesce().unwrap();
    assert_eq!(second.merged, 1);
    assert_eq!(second.task.displacement(), Vec3::new(-0.1, 0.0, 0.0));
    assert!(q.coalesce().is_none());
}

#[test]
fn unit_bursts_coalesce_then_clamp() {
    let mut q = TaskQueue::new();
    q.push(task(1.0, 0.0, 0.0));
    q.push(task(1.0, 0.0, 0.0));
    q.push(task(-1.0, 0.0, 0.0));

    // (1,0,0) + (1,0,0) merge to (2,0,0), which is clamped to MAX_TASK_DX.
    let first = q.coalesce().unwrap();
    assert_eq!(first.merged, 2);
    assert!(first.clamped);
    assert!((first.task.displacement() - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-15);

    let second = q.coalesce().unwrap();
    assert_eq!(second.merged, 1);
    assert!(second.clamped);
    assert!((second.task.displacement() - Vec3::new(-0.5, 0.0, 0.0)).length() < 1e-15);
}

#[test]
fn clamp_preserves_direction() {
    let mut q = TaskQueue::new();
    q.push(task(6.0, 8.0, 0.0));
    let c = q.coalesce().unwrap();
    assert!(c.clamped);
    assert!((c.task.displacement().length() - 0.5).abs() < 1e-15);
    assert!((c.task.displacement() - Vec3::new(0.3, 0.4, 0.0)).length() < 1e-15);
}

#[test]
fn orthogonal_tasks_merge() {
    let mut q = TaskQueue::new();
    q.push(task(0.1, 0.0, 0.0));
    q.push(task(0.0, 0.1, 0.0));
    let c = q.coalesce().unwrap();
    assert_eq!(c.merged, 2);
    assert!(!c.clamped);
}

#[test]
fn purge_empties_queue() {
    let mut q = TaskQueue::new();
    q.push(task(0.1, 0.0, 0.0));
    q.push(task(-0.1, 0.0, 0.0));
    assert_eq!(q.purge(), 2);
    assert!(q.is_empty());
    assert!(q.coalesce().is_none());
}

// ─── Scheduler Tests ──────────────────────────────────────────

#[test]
fn scheduler_starts_idle() {
    let scheduler = BrushTaskScheduler::new(Arc::new(Recorder::default()));
    assert_eq!(scheduler.state(), WorkerState::Idle);
    assert_eq!(scheduler.queued_len(), 0);
}

#[test]
fn worker_processes_and_goes_idle() {
    let recorder = Arc::new(Recorder::default());
    let scheduler = BrushTaskScheduler::new(recorder.clone());

    scheduler.enqueue(task(0.1, 0.0, 0.0)).unwrap();
    assert!(wait_until(Duration::from_secs(2), || recorder.count() == 1));
    let processed_at = Instant::now();

    assert!(wait_until(Duration::from_secs(3), || scheduler.state() == WorkerState::Idle));
    assert!(processed_at.elapsed() < MAX_IDLE_TIME + Duration::from_millis(400));

    let steps = recorder.steps.lock().unwrap();
    assert_eq!(steps[0].1, 1);
    assert_eq!(steps[0].0.displacement(), Vec3::new(0.1, 0.0, 0.0));
}

#[test]
fn worker_restarts_after_idle() {
    let recorder = Arc::new(Recorder::default());
    let scheduler = BrushTaskScheduler::new(recorder.clone());

    scheduler.enqueue(task(0.1, 0.0, 0.0)).unwrap();
    assert!(wait_until(Duration::from_secs(3), || {
        recorder.count() == 1 && scheduler.state() == WorkerState::Idle
    }));

    scheduler.enqueue(task(0.0, 0.1, 0.0)).unwrap();
    assert!(wait_until(Duration::from_secs(2), || recorder.count() == 2));
    assert_eq!(scheduler.processed_steps(), 2);
}

#[test]
fn scheduler_queue_bound() {
    let (release, gate) = mpsc::channel();
    let scheduler = BrushTaskScheduler::new(Arc::new(Gate {
        release: Mutex::new(gate),
    }));

    // The worker takes the first task and blocks on the gate.
    scheduler.enqueue(task(1.0, 0.0, 0.0)).unwrap();
    assert!(wait_until(Duration::from_secs(2), || scheduler.queued_len() == 0));

    for i in 0..MAX_TASK_QUEUE_SIZE {
        let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
        assert_eq!(scheduler.enqueue(task(sign, 0.0, 0.0)).unwrap(), EnqueueOutcome::Queued);
    }
    assert_eq!(scheduler.enqueue(task(0.0, 9.0, 0.0)).unwrap(), EnqueueOutcome::Dropped);
    assert_eq!(scheduler.queued_len(), MAX_TASK_QUEUE_SIZE);

    drop(release);
    scheduler.stop();
    assert_eq!(scheduler.state(), WorkerState::Idle);
    assert_eq!(scheduler.queued_len(), 0);
}

#[test]
fn stop_purges_and_waits() {
    let recorder = Arc::new(Recorder::with_delay(Duration::from_millis(20)));
    let scheduler = BrushTaskScheduler::new(recorder.clone());

    for i in 0..20 {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        scheduler.enqueue(task(sign * 0.1, 0.0, 0.0)).unwrap();
    }
    scheduler.stop();

    assert_eq!(scheduler.state(), WorkerState::Idle);
    assert_eq!(scheduler.queued_len(), 0);
    let done = recorder.count();
    assert!(done < 20);

    // Nothing further is processed after stop.
    thread::sleep(Duration::from_millis(60));
    assert_eq!(recorder.count(), done);
}

#[test]
fn scheduler_emits_lifecycle_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    let recorder = Arc::new(Recorder::default());
    let scheduler = BrushTaskScheduler::with_telemetry(recorder.clone(), bus.emitter());
    scheduler.enqueue(task(0.1, 0.0, 0.0)).unwrap();
    assert!(wait_until(Duration::from_secs(3), || {
        recorder.count() == 1 && scheduler.state() == WorkerState::Idle
    }));
    bus.flush();

    let kinds: Vec<EventKind> = sink.events().into_iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&EventKind::WorkerStarted));
    assert!(kinds.contains(&EventKind::TaskEnqueued { queue_len: 1 }));
    assert!(kinds.iter().any(|k| matches!(k, EventKind::TaskCoalesced { merged: 1, .. })));
    assert!(kinds.contains(&EventKind::WorkerIdle));
}

#[test]
fn spawn_failure_keeps_task_and_retries() {
    let recorder = Arc::new(Recorder::default());
    let attempts = Arc::new(AtomicUsize::new(0));
    let scheduler = BrushTaskScheduler::new(recorder.clone()).with_spawner(FlakySpawner {
        failures: 1,
        attempts: attempts.clone(),
    });

    let err = scheduler.enqueue(task(0.1, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, StrandError::WorkerSpawn(_)));
    assert_eq!(scheduler.state(), WorkerState::Idle);
    assert_eq!(scheduler.queued_len(), 1);
    assert_eq!(recorder.count(), 0);

    // The retry starts a worker that drains both tasks.
    assert_eq!(scheduler.enqueue(task(0.1, 0.0, 0.0)).unwrap(), EnqueueOutcome::Queued);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    let applied = || -> f64 {
        recorder
            .steps
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.displacement().x)
            .sum()
    };
    assert!(wait_until(Duration::from_secs(2), || (applied() - 0.2).abs() < 1e-12));
    assert_eq!(scheduler.queued_len(), 0);
}

// ─── Brush Mode Tests ─────────────────────────────────────────

fn upright_guide() -> SelectedGuide {
    SelectedGuide::new(GuideId(0), GuidePosition::identity(), straight_guide(5, 0.1))
}

#[test]
fn translate_brush_moves_non_root_vertices() {
    let mut g = upright_guide().with_weight(0.5);
    TranslateBrush.apply(&mut g, Vec3::new(0.2, 0.0, 0.0), 0.016);
    assert_eq!(g.curve.vertices[0], Vec3::ZERO);
    for v in g.curve.vertices.iter().skip(1) {
        assert!((v.x - 0.1).abs() < 1e-15);
    }
}

#[test]
fn rotate_brush_swings_rigidly() {
    let mut g = upright_guide();
    RotateBrush.apply(&mut g, Vec3::new(0.1, 0.0, 0.0), 0.016);
    assert_eq!(g.curve.vertices[0], Vec3::ZERO);
    assert!(g.curve.max_length_error() < 1e-12);

    let tip = g.curve.vertices[4];
    assert!(tip.x > 0.0);
    // Angle = 0.1 / 0.4 rad
    assert!((tip.x - 0.4 * 0.25_f64.sin()).abs() < 1e-12);
}

#[test]
fn rotate_brush_ignores_normal_aligned_stroke() {
    let mut g = upright_guide();
    let before = g.curve.vertices.clone();
    RotateBrush.apply(&mut g, Vec3::new(0.0, 0.3, 0.0), 0.016);
    assert_eq!(g.curve.vertices, before);
}

// ─── GroomProcessor Tests ─────────────────────────────────────

#[test]
fn groom_step_preserves_lengths_and_roots() {
    let guides = plane_guides(0.0, 3, 0.2, 5, 0.1);
    let roots: Vec<Vec3> = guides.iter().map(|g| g.curve.vertices[0]).collect();
    let selection = Arc::new(Mutex::new(guides));

    let processor = GroomProcessor::new(
        selection.clone(),
        None,
        Box::new(TranslateBrush),
        &SolverConfig::single_threaded(),
    )
    .unwrap();
    let batch = processor.step(&task(0.05, 0.0, 0.0), 1);
    assert_eq!(batch.guide_count(), 9);
    assert_eq!(batch.converged, 9);

    let guides = selection.lock().unwrap();
    for (g, root) in guides.iter().zip(&roots) {
        assert_eq!(g.curve.vertices[0], *root);
        assert!(g.curve.max_length_error() <= 1e-4 * 0.1);
        // The strand leans along the stroke.
        assert!(g.curve.vertices[4].x > 0.0);
    }
}

#[test]
fn groom_step_with_surface_emits_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    let selection = Arc::new(Mutex::new(plane_guides(0.0, 2, 0.2, 5, 0.1)));
    let surface: Arc<dyn SurfaceQuery> = Arc::new(PlaneSurface::ground(0.0));
    let mut cfg = SolverConfig::default();
    cfg.thread_count = 2;

    let processor = Arc::new(
        GroomProcessor::new(selection.clone(), Some(surface), Box::new(TranslateBrush), &cfg)
            .unwrap()
            .with_telemetry(bus.emitter()),
    );
    let scheduler = BrushTaskScheduler::new(processor.clone());
    scheduler.enqueue(task(0.05, -0.3, 0.0)).unwrap();
    assert!(wait_until(Duration::from_secs(3), || processor.last_batch().is_some()));
    scheduler.stop();

    bus.flush();
    let kinds: Vec<EventKind> = sink.events().into_iter().map(|e| e.kind).collect();
    assert!(kinds.iter().any(|k| matches!(k, EventKind::CollisionPass { guides: 4, .. })));
    assert!(kinds.iter().any(|k| matches!(k, EventKind::BatchSolved { guides: 4, .. })));

    let guides = selection.lock().unwrap();
    for g in guides.iter() {
        assert!(g.curve.is_finite());
        g.curve.validate().unwrap();
    }
}
