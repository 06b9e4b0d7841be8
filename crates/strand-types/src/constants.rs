//! Fixed engine constants.
//!
//! These are not user-configurable. Tunable values (thread count,
//! root offset) live in `strand_solver::SolverConfig`.

use std::time::Duration;

use crate::scalar::Scalar;

/// How long the brush worker may observe an empty queue before it exits.
pub const MAX_IDLE_TIME: Duration = Duration::from_millis(500);

/// Capacity of the brush task queue. Tasks beyond this are dropped.
pub const MAX_TASK_QUEUE_SIZE: usize = 50;

/// Maximum absolute constraint value accepted as converged.
pub const CONVERGENCE_THRESHOLD: Scalar = 1e-8;

/// Upper bound on the magnitude of one coalesced brush displacement.
pub const MAX_TASK_DX: Scalar = 0.5;

/// Squared [`MAX_TASK_DX`].
pub const MAX_TASK_DX_SQ: Scalar = MAX_TASK_DX * MAX_TASK_DX;

/// Iteration cap of the constraint solver.
pub const MAX_LOOP_ITERATIONS: u32 = 12;

/// Segment lengths at or below this are treated as degenerate guides.
pub const EPSILON: Scalar = 1e-9;

/// Default distance the root is nudged along the surface normal
/// before casting the first collision segment.
pub const DEFAULT_ROOT_OFFSET: Scalar = 0.01;
