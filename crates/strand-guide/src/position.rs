//! Guide root frame.
//!
//! Each guide stores its vertices in a local frame whose origin is the
//! root and whose +Y axis is the surface normal. The display subsystem
//! fills in the transforms; this crate only consumes them.

use serde::{Deserialize, Serialize};
use strand_math::{Mat4, Quat, Vec3};

/// World/local transforms and the surface normal at a guide's root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidePosition {
    /// Local → world.
    pub world_transform: Mat4,
    /// World → local.
    pub local_transform: Mat4,
    /// Unit surface normal at the root, world space.
    pub normal: Vec3,
}

impl GuidePosition {
    /// Frame located at `root` with its +Y axis along `normal`.
    pub fn at_root(root: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or(Vec3::Y);
        let rotation = Quat::from_rotation_arc(Vec3::Y, normal);
        let world_transform = Mat4::from_rotation_translation(rotation, root);
        Self {
            world_transform,
            local_transform: world_transform.inverse(),
            normal,
        }
    }

    /// Frame whose local space coincides with world space.
    pub fn identity() -> Self {
        Self {
            world_transform: Mat4::IDENTITY,
            local_transform: Mat4::IDENTITY,
            normal: Vec3::Y,
        }
    }

    /// Transforms a local point into world space.
    #[inline]
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        self.world_transform.transform_point3(p)
    }

    /// Transforms a world point into local space.
    #[inline]
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        self.local_transform.transform_point3(p)
    }

    /// Transforms a world direction into local space (no translation).
    #[inline]
    pub fn vector_to_local(&self, v: Vec3) -> Vec3 {
        self.local_transform.transform_vector3(v)
    }
}

impl Default for GuidePosition {
    fn default() -> Self {
        Self::identity()
    }
}
