use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math;

/// Local TRS of a host node, relative to its parent.
///
/// Hosts read and write it through [`TransformHierarchy`](crate::host::TransformHierarchy),
/// and authoring patches record it before and after every change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Composes the TRS into an affine matrix (scale, then rotation, then translation).
    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Euler angles in degrees (host convention, see [`math::quat_to_euler_degrees`]).
    #[inline]
    #[must_use]
    pub fn euler_degrees(&self) -> Vec3 {
        math::quat_to_euler_degrees(self.rotation)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A recorded reference ("rest") position and rotation.
///
/// Bone rest poses are stored relative to the avatar root; the root's own
/// rest pose is stored in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl RestPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for RestPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
