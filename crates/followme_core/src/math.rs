//! Rotation helpers shared by the retargeters.
//!
//! Euler angles exchanged with hosts are in **degrees** and composed as
//! `Ry * Rx * Rz` (Z applied first, then X, then Y), i.e. [`EulerRot::YXZ`].

use glam::{EulerRot, Quat, Vec3};

/// Directions shorter than this are treated as degenerate.
const DIRECTION_EPSILON: f32 = 1e-6;

/// Shortest-arc rotation taking direction `from` onto direction `to`.
///
/// Inputs need not be normalized. Returns identity when either vector is
/// degenerate. Opposite directions rotate by PI around an arbitrary
/// perpendicular axis.
#[must_use]
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    if from.length_squared() < DIRECTION_EPSILON || to.length_squared() < DIRECTION_EPSILON {
        return Quat::IDENTITY;
    }
    match (from.try_normalize(), to.try_normalize()) {
        (Some(a), Some(b)) => Quat::from_rotation_arc(a, b),
        _ => Quat::IDENTITY,
    }
}

/// Mirrors a local rotation across the sagittal (YZ) plane.
///
/// X and W are preserved, Y and Z are negated. Applying it twice yields the
/// original rotation.
#[inline]
#[must_use]
pub fn mirror_rotation(q: Quat) -> Quat {
    Quat::from_xyzw(q.x, -q.y, -q.z, q.w)
}

/// Converts Euler angles in degrees (x, y, z) to a quaternion.
#[inline]
#[must_use]
pub fn euler_degrees_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Converts a quaternion to Euler angles in degrees (x, y, z).
#[inline]
#[must_use]
pub fn quat_to_euler_degrees(q: Quat) -> Vec3 {
    let (y, x, z) = q.to_euler(EulerRot::YXZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Angle in radians between two rotations, ignoring the quaternion double cover.
#[inline]
#[must_use]
pub fn rotation_angle(a: Quat, b: Quat) -> f32 {
    a.normalize().angle_between(b.normalize())
}
