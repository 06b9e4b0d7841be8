//! Integration tests for strand-types.

use strand_types::constants::{MAX_TASK_DX, MAX_TASK_DX_SQ, MAX_IDLE_TIME};
use strand_types::{GuideId, StrandError};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn guide_ids_are_serializable() {
    let id = GuideId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: GuideId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Constant Tests ───────────────────────────────────────────

#[test]
fn clamp_constants_agree() {
    assert!((MAX_TASK_DX * MAX_TASK_DX - MAX_TASK_DX_SQ).abs() < 1e-15);
    assert_eq!(MAX_IDLE_TIME.as_millis(), 500);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = StrandError::InvalidGuide("guide 3 has 1 vertex".into());
    assert!(err.to_string().contains("guide 3"));
}

#[test]
fn worker_spawn_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no threads");
    let err = StrandError::WorkerSpawn(io);
    assert!(err.to_string().contains("no threads"));
    assert!(std::error::Error::source(&err).is_some());
}
