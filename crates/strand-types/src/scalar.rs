//! Scalar type alias for the engine.
//!
//! The constraint solver converges to a residual of 1e-8 on squared
//! segment lengths, which is below `f32` resolution, so the whole
//! pipeline runs in double precision.

/// The floating-point type used throughout the engine.
pub type Scalar = f64;
