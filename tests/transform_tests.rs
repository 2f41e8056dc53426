//! Transform tests
//!
//! Tests for:
//! - Transform TRS defaults and local matrix
//! - Euler angle round-trip conversions (degrees)
//! - apply_local_matrix decomposition
//! - Conversion to and from the host-facing LocalTransform

use followme::glam::{Affine3A, Quat, Vec3};
use followme::prelude::*;
use std::f32::consts::FRAC_PI_4;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::from_position(Vec3::new(10.0, 20.0, 30.0));
    t.scale = Vec3::splat(2.0);
    t.rotation = Quat::from_rotation_y(FRAC_PI_4);

    let mat = t.local_matrix();
    let (scale, rotation, translation) = mat.to_scale_rotation_translation();
    assert!(vec3_approx(scale, Vec3::splat(2.0)));
    assert!(rotation.angle_between(t.rotation) < EPSILON);
    assert!(vec3_approx(translation, Vec3::new(10.0, 20.0, 30.0)));
}

#[test]
fn transform_euler_roundtrip() {
    let mut t = Transform::new();
    let (x, y, z) = (30.0, -45.0, 60.0);
    t.set_rotation_euler(x, y, z);

    let euler = t.rotation_euler();
    assert!(approx_eq(euler.x, x), "{euler:?}");
    assert!(approx_eq(euler.y, y), "{euler:?}");
    assert!(approx_eq(euler.z, z), "{euler:?}");
}

#[test]
fn transform_euler_single_axis() {
    let mut t = Transform::new();
    t.set_rotation_euler(0.0, 90.0, 0.0);
    assert!(t.rotation.angle_between(Quat::from_rotation_y(2.0 * FRAC_PI_4)) < EPSILON);
}

#[test]
fn transform_apply_local_matrix_decomposition() {
    let original_pos = Vec3::new(5.0, -3.0, 7.0);
    let original_rot = Quat::from_rotation_y(FRAC_PI_4);
    let original_scale = Vec3::new(2.0, 3.0, 1.5);

    let mat = Affine3A::from_scale_rotation_translation(original_scale, original_rot, original_pos);

    let mut t = Transform::new();
    t.apply_local_matrix(mat);

    assert!(vec3_approx(t.position, original_pos));
    assert!(vec3_approx(t.scale, original_scale));
    // Quaternion may differ in sign, but represent the same rotation
    let angle = t.rotation.angle_between(original_rot);
    assert!(angle < 1e-4);
}

#[test]
fn transform_converts_to_and_from_local_transform() {
    let mut t = Transform::from_position(Vec3::X);
    t.rotation = Quat::from_rotation_x(0.3);
    t.scale = Vec3::new(1.0, 2.0, 3.0);

    let local: LocalTransform = t.into();
    assert_eq!(local.position, t.position);
    assert_eq!(local.rotation, t.rotation);
    assert_eq!(local.scale, t.scale);
    assert_eq!(Transform::from(local), t);
}
