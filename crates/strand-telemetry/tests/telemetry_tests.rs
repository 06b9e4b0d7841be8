//! Integration tests for strand-telemetry.

use std::thread;

use strand_telemetry::bus::EventBus;
use strand_telemetry::events::{EventKind, TelemetryEvent};
use strand_telemetry::sinks::{TracingSink, VecSink};

#[test]
fn emit_and_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.emit(TelemetryEvent::new(1, EventKind::TaskEnqueued { queue_len: 1 }));
    bus.emit(TelemetryEvent::new(1, EventKind::WorkerStarted));

    assert_eq!(bus.flush(), 2);
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, EventKind::WorkerStarted);
}

#[test]
fn disabled_bus_drops_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    let emitter = bus.emitter();

    bus.set_enabled(false);
    emitter.emit(TelemetryEvent::new(0, EventKind::TaskDropped));
    assert_eq!(bus.flush(), 0);
    assert!(sink.is_empty());
}

#[test]
fn full_bus_discards_until_flushed() {
    let mut bus = EventBus::with_capacity(4);
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    let emitter = bus.emitter();

    for i in 0..10 {
        emitter.emit(TelemetryEvent::new(i, EventKind::TaskEnqueued { queue_len: 1 }));
    }
    assert_eq!(bus.discarded(), 6);
    assert_eq!(bus.flush(), 4);
    assert_eq!(sink.events()[3].task, 3);

    emitter.emit(TelemetryEvent::new(10, EventKind::TaskDropped));
    assert_eq!(bus.flush(), 1);
    assert_eq!(bus.discarded(), 6);
}

#[test]
fn emitter_sends_from_other_thread() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    let emitter = bus.emitter();
    thread::spawn(move || {
        for task in 0..5 {
            emitter.emit(TelemetryEvent::new(task, EventKind::WorkerIdle));
        }
    })
    .join()
    .unwrap();

    bus.finalize();
    assert_eq!(sink.len(), 5);
}

#[test]
fn multiple_sinks() {
    let mut bus = EventBus::new();
    let a = VecSink::new();
    bus.add_sink(Box::new(a.clone()));
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));
    assert_eq!(bus.sink_count(), 2);

    bus.emit(TelemetryEvent::new(0, EventKind::TaskDropped));
    bus.flush();
    assert_eq!(a.len(), 1);
}

#[test]
fn event_serialization() {
    let event = TelemetryEvent::new(
        7,
        EventKind::BatchSolved {
            guides: 12,
            converged: 11,
            iteration_cap: 0,
            singular: 1,
            wall_time: 0.002,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("singular"));
    let recovered: TelemetryEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}
