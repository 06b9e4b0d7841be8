//! # strand-guide
//!
//! Guide curve representation shared by the collision classifier,
//! the constraint solver and the brush scheduler.
//!
//! ## Key Types
//!
//! - [`GuideCurve`]: root-anchored polyline with a rest segment length and
//!   a parallel array of [`CollisionInfo`] records (guide-local space).
//! - [`GuidePosition`]: world/local transforms and surface normal at the root.
//! - [`SelectedGuide`]: one guide in the active brush selection.
//! - Procedural generators for tests and benchmarks.

pub mod collision;
pub mod generators;
pub mod guide;
pub mod position;
pub mod selection;

pub use collision::CollisionInfo;
pub use guide::GuideCurve;
pub use position::GuidePosition;
pub use selection::{SelectedGuide, SelectedGuides};
