//! # strand-types
//!
//! Shared types, identifiers, error types, and engine constants
//! for the strand guide-grooming engine.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other strand crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{StrandError, StrandResult};
pub use ids::GuideId;
pub use scalar::Scalar;
