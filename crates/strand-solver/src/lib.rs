//! # strand-solver
//!
//! Position-based constraint projection for guide curves.
//!
//! ## Key Types
//!
//! - [`ConstraintSolver`]: iterative Lagrange-multiplier projection
//!   (full mode with collision rows, lightweight mode on raw vertices)
//! - [`ConstraintSet`]: fixed-capacity constraint/Jacobian buffers with
//!   a shrinkable active row count
//! - [`ParallelSolver`]: per-guide fan-out over a bounded rayon pool
//! - [`SolverConfig`]: thread count, root offset, collision toggle

pub mod config;
pub mod constraint_set;
pub mod parallel;
pub mod solver;

pub use config::SolverConfig;
pub use constraint_set::{CollisionRow, ConstraintSet};
pub use parallel::{BatchReport, ParallelSolver};
pub use solver::{ConstraintSolver, SolveReport, SolveStatus};
