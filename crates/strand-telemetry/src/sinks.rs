//! Pluggable event sinks.

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::TelemetryEvent;

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &TelemetryEvent);

    /// Called when the session ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a buffer that stays readable after the sink
/// has been boxed into a bus.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events collected so far.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events collected so far.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that forwards events to `tracing`.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &TelemetryEvent) {
        let level = self.level;
        if level == tracing::Level::ERROR || level == tracing::Level::WARN {
            tracing::warn!(task = event.task, event = ?event.kind, "strand_event");
        } else if level == tracing::Level::INFO {
            tracing::info!(task = event.task, event = ?event.kind, "strand_event");
        } else if level == tracing::Level::DEBUG {
            tracing::debug!(task = event.task, event = ?event.kind, "strand_event");
        } else {
            tracing::trace!(task = event.task, event = ?event.kind, "strand_event");
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
