use followme_core::LocalTransform;
use followme_core::math;
use glam::{Affine3A, Quat, Vec3};

/// Transform component.
///
/// Holds a node's position, rotation and scale relative to its parent.
/// World matrices are composed on demand by walking the parent chain, so a
/// write is visible to the very next read without a propagation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// Local matrix (scale, then rotation, then translation).
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Sets the rotation from Euler angles in degrees (Z, then X, then Y).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = math::euler_degrees_to_quat(Vec3::new(x, y, z));
    }

    /// Current rotation as Euler angles in degrees.
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        math::quat_to_euler_degrees(self.rotation)
    }

    /// Replaces TRS from a matrix. Shear, if any, is lost.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        let (scale, rotation, translation) = mat.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = rotation;
        self.position = translation;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Transform> for LocalTransform {
    fn from(t: Transform) -> Self {
        LocalTransform {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

impl From<LocalTransform> for Transform {
    fn from(t: LocalTransform) -> Self {
        Transform {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}
