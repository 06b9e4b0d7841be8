//! Telemetry event types.
//!
//! Lightweight value types describing what the brush worker and the
//! solve pipeline did. Events are tagged with the brush task sequence
//! number they belong to (0 for events outside any task).

use serde::{Deserialize, Serialize};

/// A telemetry event emitted by the grooming engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Brush task sequence number.
    pub task: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A brush task entered the queue.
    TaskEnqueued {
        /// Queue length after the push.
        queue_len: usize,
    },

    /// A brush task was discarded because the queue was full.
    TaskDropped,

    /// Queued tasks were merged into one step.
    TaskCoalesced {
        /// Number of queued tasks merged.
        merged: usize,
        /// Magnitude of the combined displacement after clamping.
        magnitude: f64,
        /// Whether the combined displacement was clamped.
        clamped: bool,
    },

    /// The background worker started.
    WorkerStarted,

    /// The worker exited after its idle timeout.
    WorkerIdle,

    /// The worker exited on a stop request.
    WorkerStopped,

    /// A collision classification pass completed.
    CollisionPass {
        /// Guides classified.
        guides: usize,
        /// Colliding vertices over all guides.
        colliding: usize,
    },

    /// A batch of guides was solved.
    BatchSolved {
        /// Guides in the batch.
        guides: usize,
        /// Guides that converged.
        converged: usize,
        /// Guides that hit the iteration cap.
        iteration_cap: usize,
        /// Guides aborted on a singular system.
        singular: usize,
        /// Wall-clock time of the batch (seconds).
        wall_time: f64,
    },
}

impl TelemetryEvent {
    /// Creates a new event for the given task.
    pub fn new(task: u64, kind: EventKind) -> Self {
        Self { task, kind }
    }
}
