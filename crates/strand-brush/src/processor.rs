//! Task processors run by the brush worker.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use strand_contact::{CollisionClassifier, SurfaceQuery};
use strand_guide::SelectedGuides;
use strand_solver::{BatchReport, ParallelSolver, SolverConfig};
use strand_telemetry::{EventEmitter, EventKind, TelemetryEvent};
use strand_types::StrandResult;

use crate::brush_mode::BrushMode;
use crate::task::BrushTask;

/// Work performed by the brush worker for each coalesced task.
///
/// Called on the worker thread, one task at a time.
pub trait TaskProcessor: Send + Sync + 'static {
    /// Processes one coalesced task. `sequence` starts at 1 and counts
    /// coalesced steps over the scheduler's lifetime.
    fn process(&self, task: &BrushTask, sequence: u64);
}

/// Brush, collision pass and parallel solve over a shared selection.
///
/// The selection stays owned by the caller; it is locked for the
/// duration of one step and never retained beyond it.
pub struct GroomProcessor {
    selection: Arc<Mutex<SelectedGuides>>,
    surface: Option<Arc<dyn SurfaceQuery>>,
    brush: Box<dyn BrushMode>,
    classifier: CollisionClassifier,
    solver: ParallelSolver,
    detect_collisions: bool,
    emitter: Option<EventEmitter>,
    last_batch: Mutex<Option<BatchReport>>,
}

impl GroomProcessor {
    /// Creates a processor from a validated solver configuration.
    pub fn new(
        selection: Arc<Mutex<SelectedGuides>>,
        surface: Option<Arc<dyn SurfaceQuery>>,
        brush: Box<dyn BrushMode>,
        config: &SolverConfig,
    ) -> StrandResult<Self> {
        Ok(Self {
            selection,
            surface,
            brush,
            classifier: CollisionClassifier::new(config.root_offset),
            solver: ParallelSolver::new(config)?,
            detect_collisions: config.detect_collisions,
            emitter: None,
            last_batch: Mutex::new(None),
        })
    }

    /// Emits collision and solve telemetry through `emitter`.
    pub fn with_telemetry(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Report of the most recent batch solve.
    pub fn last_batch(&self) -> Option<BatchReport> {
        self.last_batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs one brush step synchronously on the calling thread.
    pub fn step(&self, task: &BrushTask, sequence: u64) -> BatchReport {
        let mut guides = self
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        for guide in guides.iter_mut() {
            self.brush
                .apply(guide, task.displacement(), task.delta_time());
        }

        match (&self.surface, self.detect_collisions) {
            (Some(surface), true) => {
                let pass = self
                    .classifier
                    .classify_selection(&mut guides, surface.as_ref());
                self.emit(
                    sequence,
                    EventKind::CollisionPass {
                        guides: pass.guides,
                        colliding: pass.colliding,
                    },
                );
            }
            _ => guides.iter_mut().for_each(|g| g.curve.clear_collisions()),
        }

        let batch = self.solver.solve_selection(&mut guides);
        drop(guides);

        debug!(
            sequence,
            brush = self.brush.name(),
            guides = batch.guide_count(),
            singular = batch.singular,
            "Brush step processed"
        );
        self.emit(
            sequence,
            EventKind::BatchSolved {
                guides: batch.guide_count(),
                converged: batch.converged,
                iteration_cap: batch.iteration_cap,
                singular: batch.singular,
                wall_time: batch.wall_time,
            },
        );

        *self
            .last_batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(batch.clone());
        batch
    }

    fn emit(&self, task: u64, kind: EventKind) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(TelemetryEvent::new(task, kind));
        }
    }
}

impl TaskProcessor for GroomProcessor {
    fn process(&self, task: &BrushTask, sequence: u64) {
        self.step(task, sequence);
    }
}
