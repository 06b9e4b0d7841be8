//! # strand-brush
//!
//! Decouples the interactive thread from collision detection and
//! constraint solving.
//!
//! ## Key Types
//!
//! - [`BrushTask`]: one drag sample (displacement and time step)
//! - [`TaskQueue`]: bounded FIFO with coalescing of same-direction bursts
//! - [`BrushTaskScheduler`]: owns the queue and a lazily started worker
//!   thread that exits after [`MAX_IDLE_TIME`](strand_types::constants::MAX_IDLE_TIME)
//! - [`TaskProcessor`]: what the worker does with each coalesced task
//! - [`GroomProcessor`]: brush mode, collision pass and parallel solve
//!   over a shared guide selection

pub mod brush_mode;
pub mod processor;
pub mod queue;
pub mod scheduler;
pub mod task;

pub use brush_mode::{BrushKind, BrushMode, RotateBrush, TranslateBrush};
pub use processor::{GroomProcessor, TaskProcessor};
pub use queue::{CoalescedTask, EnqueueOutcome, TaskQueue};
pub use scheduler::{BrushTaskScheduler, ThreadSpawner, WorkerJob, WorkerSpawner, WorkerState};
pub use task::BrushTask;
