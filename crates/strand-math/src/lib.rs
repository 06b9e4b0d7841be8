//! # strand-math
//!
//! Linear algebra primitives for the strand grooming engine.
//!
//! Provides:
//! - Re-exports of the double-precision `glam` types under short names
//! - A row-major dense matrix with a fixed allocation and a shrinkable
//!   active row count (constraint Jacobians and Gram matrices)
//! - [`GramSolver`]: LLᵀ solve of the symmetric Gram system via `faer`,
//!   reporting singular systems as a value

pub mod dense;
pub mod gram_solver;

pub use dense::DenseMatrix;
pub use gram_solver::{GramSolver, SolveOutcome};

// Re-export glam f64 types as the canonical math types for strand.
pub use glam::{DMat4 as Mat4, DQuat as Quat, DVec3 as Vec3};
