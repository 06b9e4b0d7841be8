//! Event bus: channel-backed event dispatch with pluggable sinks.
//!
//! Producers on any thread hold an [`EventEmitter`]; the bus owner drains
//! the channel into its sinks on [`EventBus::flush`]. The channel is
//! bounded: once `capacity` events are pending, further events are
//! discarded and counted until the owner flushes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use crate::events::TelemetryEvent;
use crate::sinks::EventSink;

/// Pending events held before emitters start discarding.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Sending half of the bus. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    sender: mpsc::SyncSender<TelemetryEvent>,
    enabled: Arc<AtomicBool>,
    discarded: Arc<AtomicU64>,
}

impl EventEmitter {
    /// Emit an event without blocking. No-op while the bus is disabled
    /// or gone; counted as discarded while the channel is full.
    pub fn emit(&self, event: TelemetryEvent) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        if let Err(mpsc::TrySendError::Full(_)) = self.sender.try_send(event) {
            self.discarded.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Event bus for grooming telemetry.
pub struct EventBus {
    emitter: EventEmitter,
    receiver: mpsc::Receiver<TelemetryEvent>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    /// Creates a new event bus with no sinks and [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus holding at most `capacity` undelivered events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel(capacity.max(1));
        Self {
            emitter: EventEmitter {
                sender,
                enabled: Arc::new(AtomicBool::new(true)),
                discarded: Arc::new(AtomicU64::new(0)),
            },
            receiver,
            sinks: Vec::new(),
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Returns a sender usable from other threads.
    pub fn emitter(&self) -> EventEmitter {
        self.emitter.clone()
    }

    /// Enables or disables the bus, including every emitter handed out.
    pub fn set_enabled(&self, enabled: bool) {
        self.emitter.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns true if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.emitter.enabled.load(Ordering::Relaxed)
    }

    /// Events discarded so far because the channel was full.
    pub fn discarded(&self) -> u64 {
        self.emitter.discarded.load(Ordering::Relaxed)
    }

    /// Emit an event from the owning thread.
    pub fn emit(&self, event: TelemetryEvent) {
        self.emitter.emit(event);
    }

    /// Dispatches all pending events to the registered sinks and returns
    /// how many were delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            delivered += 1;
        }
        delivered
    }

    /// Flushes pending events, then lets every sink finalize.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
