//! # strand-telemetry
//!
//! Event bus for grooming telemetry. The brush worker and the solve
//! pipeline emit structured events (queue activity, worker lifecycle,
//! collision passes, batch solves) through a cloneable [`EventEmitter`];
//! the owner of the [`EventBus`] dispatches them to pluggable sinks.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{EventBus, EventEmitter};
pub use events::{EventKind, TelemetryEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
