//! # strand-contact
//!
//! Collision detection between guide curves and a closed query surface.
//!
//! Two layers:
//! 1. **Surface query**: [`SurfaceQuery`] answers segment intersection
//!    counts and closest-point queries in world space.
//! 2. **Classification**: [`CollisionClassifier`] walks each guide from
//!    its root with a ray-parity test and fills the per-vertex
//!    [`CollisionInfo`](strand_guide::CollisionInfo) records.
//!
//! Surfaces are pluggable; analytic spheres and planes are provided for
//! tests and benchmarks, [`MeshSurface`] for arbitrary closed meshes.

pub mod classifier;
pub mod mesh;
pub mod plane;
pub mod sphere;
pub mod surface;

pub use classifier::{ClassifyReport, CollisionClassifier};
pub use mesh::MeshSurface;
pub use plane::PlaneSurface;
pub use sphere::SphereSurface;
pub use surface::SurfaceQuery;
