//! Brush task scheduler.
//!
//! Owns the [`TaskQueue`] and at most one background worker thread.
//!
//! ```text
//! Idle ──enqueue──▶ Running ──queue empty for MAX_IDLE_TIME──▶ Idle
//!                      │
//!                      └──────────────stop()────────────────▶ Idle
//! ```
//!
//! Two critical sections: the queue (with a condition variable the
//! worker sleeps on) and the run state (running flag plus join handle).
//! Lock order is always queue, then run state. The worker clears its
//! running flag while still holding the queue lock, so a task pushed
//! after the worker decided to exit always finds the scheduler idle and
//! starts a fresh worker.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, warn};

use strand_telemetry::{EventEmitter, EventKind, TelemetryEvent};
use strand_types::constants::MAX_IDLE_TIME;
use strand_types::{StrandError, StrandResult};

use crate::processor::TaskProcessor;
use crate::queue::{EnqueueOutcome, TaskQueue};
use crate::task::BrushTask;

/// Lifecycle state of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// No worker thread exists.
    Idle,
    /// A worker thread is draining the queue.
    Running,
}

/// Body of a brush worker thread.
pub type WorkerJob = Box<dyn FnOnce() + Send + 'static>;

/// Starts the thread that runs a brush worker.
pub trait WorkerSpawner: Send + Sync {
    /// Runs `job` on a new thread.
    fn spawn(&self, job: WorkerJob) -> io::Result<JoinHandle<()>>;
}

/// Spawns a named OS thread per worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl WorkerSpawner for ThreadSpawner {
    fn spawn(&self, job: WorkerJob) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("strand-brush-worker".into())
            .spawn(job)
    }
}

#[derive(Default)]
struct RunState {
    running: bool,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    queue: Mutex<TaskQueue>,
    available: Condvar,
    run_state: Mutex<RunState>,
    stop_requested: AtomicBool,
    sequence: AtomicU64,
    processor: Arc<dyn TaskProcessor>,
    emitter: Option<EventEmitter>,
}

impl Shared {
    fn emit(&self, task: u64, kind: EventKind) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(TelemetryEvent::new(task, kind));
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producer/consumer scheduler for brush tasks.
///
/// `enqueue`, `purge` and `state` never block on task processing, so they
/// are safe to call from the interactive thread. Dropping the scheduler
/// stops the worker.
pub struct BrushTaskScheduler {
    shared: Arc<Shared>,
    spawner: Box<dyn WorkerSpawner>,
}

impl BrushTaskScheduler {
    /// Creates an idle scheduler that hands coalesced tasks to `processor`.
    pub fn new(processor: Arc<dyn TaskProcessor>) -> Self {
        Self::build(processor, None)
    }

    /// Like [`new`](Self::new), also emitting telemetry through `emitter`.
    pub fn with_telemetry(processor: Arc<dyn TaskProcessor>, emitter: EventEmitter) -> Self {
        Self::build(processor, Some(emitter))
    }

    fn build(processor: Arc<dyn TaskProcessor>, emitter: Option<EventEmitter>) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(TaskQueue::new()),
                available: Condvar::new(),
                run_state: Mutex::new(RunState::default()),
                stop_requested: AtomicBool::new(false),
                sequence: AtomicU64::new(0),
                processor,
                emitter,
            }),
            spawner: Box::new(ThreadSpawner),
        }
    }

    /// Replaces how worker threads are started.
    pub fn with_spawner(mut self, spawner: impl WorkerSpawner + 'static) -> Self {
        self.spawner = Box::new(spawner);
        self
    }

    /// Queues a task and makes sure a worker is running.
    ///
    /// A full queue drops the task and reports [`EnqueueOutcome::Dropped`].
    /// The only error is a failure to start the worker thread; the task
    /// stays queued and the next call retries the start.
    pub fn enqueue(&self, task: BrushTask) -> StrandResult<EnqueueOutcome> {
        let (outcome, queue_len) = {
            let mut queue = lock(&self.shared.queue);
            let outcome = queue.push(task);
            (outcome, queue.len())
        };

        match outcome {
            EnqueueOutcome::Queued => {
                self.shared.emit(0, EventKind::TaskEnqueued { queue_len });
                self.shared.available.notify_one();
            }
            EnqueueOutcome::Dropped => {
                debug!(queue_len, "Brush queue full; task dropped");
                self.shared.emit(0, EventKind::TaskDropped);
            }
        }

        self.ensure_worker()?;
        Ok(outcome)
    }

    /// Discards every queued task. Returns how many were removed.
    pub fn purge(&self) -> usize {
        let removed = lock(&self.shared.queue).purge();
        if removed > 0 {
            debug!(removed, "Brush queue purged");
        }
        removed
    }

    /// Requests the worker to exit, purges the queue and waits until the
    /// worker has gone idle.
    ///
    /// A task already being processed runs to completion first.
    pub fn stop(&self) {
        self.shared.stop_requested.store(true, Ordering::Release);
        self.purge();
        self.shared.available.notify_all();

        while self.state() == WorkerState::Running {
            thread::yield_now();
        }

        let handle = lock(&self.shared.run_state).handle.take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Brush worker panicked");
            }
        }
    }

    /// Current worker state.
    pub fn state(&self) -> WorkerState {
        if lock(&self.shared.run_state).running {
            WorkerState::Running
        } else {
            WorkerState::Idle
        }
    }

    /// Number of tasks waiting in the queue.
    pub fn queued_len(&self) -> usize {
        lock(&self.shared.queue).len()
    }

    /// Number of coalesced steps handed to the processor so far.
    pub fn processed_steps(&self) -> u64 {
        self.shared.sequence.load(Ordering::Acquire)
    }

    fn ensure_worker(&self) -> StrandResult<()> {
        let mut run_state = lock(&self.shared.run_state);
        if run_state.running {
            return Ok(());
        }

        // A previous worker has already cleared its flag and is exiting.
        if let Some(old) = run_state.handle.take() {
            if old.join().is_err() {
                warn!("Previous brush worker panicked");
            }
        }

        self.shared.stop_requested.store(false, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let handle = self
            .spawner
            .spawn(Box::new(move || worker_loop(shared)))
            .map_err(|e| {
                warn!(error = %e, "Failed to start brush worker");
                StrandError::WorkerSpawn(e)
            })?;

        run_state.running = true;
        run_state.handle = Some(handle);
        drop(run_state);

        debug!("Brush worker started");
        self.shared.emit(0, EventKind::WorkerStarted);
        Ok(())
    }
}

impl Drop for BrushTaskScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Clears the running flag if the worker unwinds out of a processor.
struct PanicGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(&self.shared.run_state).running = false;
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    let mut guard = PanicGuard {
        shared: &shared,
        armed: true,
    };
    let mut queue = lock(&shared.queue);
    let mut idle_since = Instant::now();

    let exit_kind = loop {
        if shared.stop_requested.load(Ordering::Acquire) {
            break EventKind::WorkerStopped;
        }

        if let Some(step) = queue.coalesce() {
            drop(queue);

            let seq = shared.sequence.fetch_add(1, Ordering::AcqRel) + 1;
            shared.emit(
                seq,
                EventKind::TaskCoalesced {
                    merged: step.merged,
                    magnitude: step.task.displacement().length(),
                    clamped: step.clamped,
                },
            );
            shared.processor.process(&step.task, seq);

            idle_since = Instant::now();
            queue = lock(&shared.queue);
            continue;
        }

        let idle = idle_since.elapsed();
        if idle >= MAX_IDLE_TIME {
            break EventKind::WorkerIdle;
        }
        queue = match shared.available.wait_timeout(queue, MAX_IDLE_TIME - idle) {
            Ok((q, _)) => q,
            Err(poisoned) => poisoned.into_inner().0,
        };
    };

    // Still holding the queue lock: see the module docs.
    lock(&shared.run_state).running = false;
    guard.armed = false;
    drop(queue);

    debug!(reason = ?exit_kind, "Brush worker exiting");
    shared.emit(shared.sequence.load(Ordering::Acquire), exit_kind);
}
