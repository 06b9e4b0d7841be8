//! Bounded brush task queue.
//!
//! FIFO of at most [`MAX_TASK_QUEUE_SIZE`] tasks. New tasks are dropped
//! when full; nothing already queued is evicted.

use std::collections::VecDeque;

use strand_types::constants::{MAX_TASK_DX, MAX_TASK_DX_SQ, MAX_TASK_QUEUE_SIZE};

use crate::task::BrushTask;

/// Result of pushing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The task was appended.
    Queued,
    /// The queue was full and the task was discarded.
    Dropped,
}

/// A run of queued tasks merged into one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoalescedTask {
    /// Combined task. Displacement magnitude is at most `MAX_TASK_DX`.
    pub task: BrushTask,
    /// Number of queued tasks merged.
    pub merged: usize,
    /// Whether the combined displacement was rescaled to `MAX_TASK_DX`.
    pub clamped: bool,
}

/// Bounded FIFO of brush tasks.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tasks: VecDeque<BrushTask>,
    capacity: usize,
}

impl TaskQueue {
    /// Queue with the engine capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_TASK_QUEUE_SIZE)
    }

    /// Queue with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `task`, or drops it if the queue is full.
    pub fn push(&mut self, task: BrushTask) -> EnqueueOutcome {
        if self.tasks.len() >= self.capacity {
            return EnqueueOutcome::Dropped;
        }
        self.tasks.push_back(task);
        EnqueueOutcome::Queued
    }

    /// Pops the front task and merges every following task whose
    /// displacement does not oppose the running sum.
    ///
    /// Displacements and time steps are summed; the merged displacement
    /// is rescaled to `MAX_TASK_DX` if longer. Returns `None` when empty.
    pub fn coalesce(&mut self) -> Option<CoalescedTask> {
        let first = self.tasks.pop_front()?;
        let mut displacement = first.displacement();
        let mut delta_time = first.delta_time();
        let mut merged = 1;

        while let Some(next) = self.tasks.front() {
            if displacement.dot(next.displacement()) < 0.0 {
                break;
            }
            displacement += next.displacement();
            delta_time += next.delta_time();
            merged += 1;
            self.tasks.pop_front();
        }

        let clamped = displacement.length_squared() > MAX_TASK_DX_SQ;
        if clamped {
            displacement = displacement.normalize() * MAX_TASK_DX;
        }

        Some(CoalescedTask {
            task: BrushTask::new(displacement, delta_time),
            merged,
            clamped,
        })
    }

    /// Discards every queued task and returns how many were removed.
    pub fn purge(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Maximum number of queued tasks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queued tasks, front first.
    pub fn iter(&self) -> impl Iterator<Item = &BrushTask> {
        self.tasks.iter()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
