//! Authoring tool tests
//!
//! Tests for:
//! - Mirror pose (involution, world-space symmetry, undo)
//! - Align skeleton (limb directions, skipped steps)
//! - Reset / save / load against a template rig
//! - Edit command undo / redo

mod common;

use common::*;
use followme::glam::EulerRot;
use followme::prelude::*;
use followme::retarget::authoring::ALIGN_STEPS;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

fn rig() -> (Scene, Rig) {
    let mut scene = Scene::new();
    let rig = build_rig(&mut scene, "Avatar", "", 1.0);
    (scene, rig)
}

fn local_rotations(scene: &Scene, rig: &Rig, names: &[&str]) -> Vec<Quat> {
    names
        .iter()
        .map(|n| scene.local_rotation(rig.bone(scene, n)).unwrap())
        .collect()
}

const LEFT_ARM: &[&str] = &["LeftUpperArm", "LeftLowerArm", "LeftHand", "Left Index Proximal"];
const RIGHT_ARM: &[&str] = &[
    "RightUpperArm",
    "RightLowerArm",
    "RightHand",
    "Right Index Proximal",
];

// ============================================================================
// Mirror
// ============================================================================

#[test]
fn mirror_copies_left_to_right_with_sign_flip() {
    let (mut scene, rig) = rig();
    let q = Quat::from_euler(EulerRot::XYZ, 0.2, -0.4, 0.6);
    scene.set_rotation(rig.bone(&scene, "LeftLowerArm"), q);

    let snapshot = rig.snapshot(&scene);
    let command = mirror_pose(&mut scene, &snapshot, true);

    let right = scene.local_rotation(rig.bone(&scene, "RightLowerArm")).unwrap();
    assert!(quat_approx(right, Quat::from_xyzw(q.x, -q.y, -q.z, q.w)));
    assert!(!command.is_empty());
}

#[test]
fn mirror_round_trip_restores_source_side() {
    let (mut scene, rig) = rig();
    for (i, name) in LEFT_ARM.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let q = Quat::from_euler(EulerRot::YXZ, 0.1 * i as f32, 0.3, -0.2);
        scene.set_rotation(rig.bone(&scene, name), q);
    }
    let original = local_rotations(&scene, &rig, LEFT_ARM);

    let snapshot = rig.snapshot(&scene);
    mirror_pose(&mut scene, &snapshot, true);
    mirror_pose(&mut scene, &snapshot, false);

    let restored = local_rotations(&scene, &rig, LEFT_ARM);
    for (a, b) in restored.iter().zip(&original) {
        assert!(quat_approx(*a, *b), "{a:?} vs {b:?}");
    }
}

#[test]
fn mirrored_arm_is_symmetric_in_world_space() {
    let (mut scene, rig) = rig();
    scene.set_rotation(
        rig.bone(&scene, "LeftUpperArm"),
        Quat::from_rotation_z(-FRAC_PI_4),
    );

    let snapshot = rig.snapshot(&scene);
    mirror_pose(&mut scene, &snapshot, true);

    let left = scene.world_position(rig.bone(&scene, "LeftHand")).unwrap();
    let right = scene.world_position(rig.bone(&scene, "RightHand")).unwrap();
    assert!(vec3_approx(right, Vec3::new(-left.x, left.y, left.z)), "{left:?} {right:?}");
}

#[test]
fn mirror_undo_restores_destination_side() {
    let (mut scene, rig) = rig();
    scene.set_rotation(rig.bone(&scene, "RightHand"), Quat::from_rotation_x(0.7));
    scene.set_rotation(rig.bone(&scene, "LeftHand"), Quat::from_rotation_y(0.4));
    let before = local_rotations(&scene, &rig, RIGHT_ARM);

    let snapshot = rig.snapshot(&scene);
    let command = mirror_pose(&mut scene, &snapshot, true);
    assert_ne!(local_rotations(&scene, &rig, RIGHT_ARM), before);

    command.undo(&mut scene);
    for (a, b) in local_rotations(&scene, &rig, RIGHT_ARM).iter().zip(&before) {
        assert!(quat_approx(*a, *b));
    }

    command.redo(&mut scene);
    let hand = scene.local_rotation(rig.bone(&scene, "RightHand")).unwrap();
    assert!(quat_approx(hand, math::mirror_rotation(Quat::from_rotation_y(0.4))));
}

#[test]
fn mirror_skips_pairs_with_unresolved_side() {
    let (mut scene, mut rig) = rig();
    let right_hand = rig.bone(&scene, "RightHand");
    rig.setting
        .avatar_description
        .human_bones
        .retain(|b| b.human_name != "RightHand");
    scene.set_rotation(rig.bone(&scene, "LeftHand"), Quat::from_rotation_z(0.5));

    let snapshot = rig.snapshot(&scene);
    let command = mirror_pose(&mut scene, &snapshot, true);

    assert_eq!(scene.local_rotation(right_hand), Some(Quat::IDENTITY));
    assert!(command.patches.iter().all(|p| p.node != right_hand));
}

// ============================================================================
// Align
// ============================================================================

fn limb_direction(scene: &Scene, rig: &Rig, from: &str, to: &str) -> Vec3 {
    let a = scene.world_position(rig.bone(scene, from)).unwrap();
    let b = scene.world_position(rig.bone(scene, to)).unwrap();
    (b - a).normalize()
}

#[test]
fn align_points_target_limbs_like_source() {
    let mut scene = Scene::new();
    let source = build_rig(&mut scene, "Source", "", 1.0);
    let target = build_rig(&mut scene, "Target", "tgt:", 1.3);

    // Source stands with arms down and a bent elbow.
    scene.set_rotation(source.bone(&scene, "LeftUpperArm"), Quat::from_rotation_z(-FRAC_PI_2));
    scene.set_rotation(source.bone(&scene, "LeftLowerArm"), Quat::from_rotation_y(0.6));
    scene.set_rotation(source.bone(&scene, "RightUpperLeg"), Quat::from_rotation_x(0.4));

    let source_snapshot = source.snapshot(&scene);
    let pose = source_snapshot.sample(&scene).unwrap();
    let target_snapshot = target.snapshot(&scene);
    let command = align_skeleton(&source_snapshot, &pose, &target_snapshot, &mut scene);

    assert_eq!(command.len(), ALIGN_STEPS.len());
    for (from, to) in [
        ("LeftUpperArm", "LeftLowerArm"),
        ("LeftLowerArm", "LeftHand"),
        ("RightUpperLeg", "RightLowerLeg"),
        ("RightLowerLeg", "RightFoot"),
    ] {
        let s = limb_direction(&scene, &source, from, to);
        let t = limb_direction(&scene, &target, from, to);
        assert!(vec3_approx(s, t), "{from}: {s:?} vs {t:?}");
    }
}

#[test]
fn align_hand_uses_finger_centroid() {
    let mut scene = Scene::new();
    let source = build_rig(&mut scene, "Source", "", 1.0);
    let target = build_rig(&mut scene, "Target", "tgt:", 1.0);
    scene.set_rotation(source.bone(&scene, "LeftHand"), Quat::from_rotation_y(0.5));

    let source_snapshot = source.snapshot(&scene);
    let pose = source_snapshot.sample(&scene).unwrap();
    let target_snapshot = target.snapshot(&scene);
    align_skeleton(&source_snapshot, &pose, &target_snapshot, &mut scene);

    let centroid = |rig: &Rig, scene: &Scene| {
        let hand = scene.world_position(rig.bone(scene, "LeftHand")).unwrap();
        let sum: Vec3 = [
            "Left Thumb Proximal",
            "Left Index Proximal",
            "Left Middle Proximal",
            "Left Ring Proximal",
            "Left Little Proximal",
        ]
        .iter()
        .map(|n| scene.world_position(rig.bone(scene, n)).unwrap())
        .sum();
        (sum / 5.0 - hand).normalize()
    };
    assert!(vec3_approx(centroid(&source, &scene), centroid(&target, &scene)));
}

#[test]
fn align_skips_steps_with_unresolved_bones() {
    let mut scene = Scene::new();
    let source = build_rig(&mut scene, "Source", "", 1.0);
    let mut target = build_rig(&mut scene, "Target", "tgt:", 1.0);
    let upper_arm = target.bone(&scene, "LeftUpperArm");
    target
        .setting
        .avatar_description
        .human_bones
        .retain(|b| b.human_name != "LeftLowerArm");
    scene.set_rotation(source.bone(&scene, "LeftUpperArm"), Quat::from_rotation_z(-1.0));

    let source_snapshot = source.snapshot(&scene);
    let pose = source_snapshot.sample(&scene).unwrap();
    let target_snapshot = target.snapshot(&scene);
    let command = align_skeleton(&source_snapshot, &pose, &target_snapshot, &mut scene);

    // Both steps touching the lower arm are skipped.
    assert_eq!(command.len(), ALIGN_STEPS.len() - 2);
    assert!(command.patches.iter().all(|p| p.node != upper_arm));
    assert_eq!(scene.local_rotation(upper_arm), Some(Quat::IDENTITY));
}

#[test]
fn align_undo_restores_rest_pose() {
    let mut scene = Scene::new();
    let source = build_rig(&mut scene, "Source", "", 1.0);
    let target = build_rig(&mut scene, "Target", "tgt:", 1.0);
    scene.set_rotation(source.bone(&scene, "RightUpperArm"), Quat::from_rotation_z(1.2));

    let source_snapshot = source.snapshot(&scene);
    let pose = source_snapshot.sample(&scene).unwrap();
    let target_snapshot = target.snapshot(&scene);
    let command = align_skeleton(&source_snapshot, &pose, &target_snapshot, &mut scene);
    command.undo(&mut scene);

    for name in registry_names() {
        let rotation = scene.local_rotation(target.bone(&scene, name)).unwrap();
        assert!(quat_approx(rotation, Quat::IDENTITY), "{name}");
    }
}

// ============================================================================
// Reset / Save / Load
// ============================================================================

#[test]
fn reset_records_root_relative_rest_pose() {
    let (mut scene, mut rig) = rig();
    let root_rotation = Quat::from_rotation_y(FRAC_PI_2);
    scene.set_world_position(rig.root, Vec3::new(1.0, 0.0, 2.0));
    scene.set_world_rotation(rig.root, root_rotation);

    let written = reset_avatar(&scene, rig.root, &mut rig.setting);
    assert_eq!(written, registry_names().len());

    let description = &rig.setting.avatar_description;
    let hips = description.find("Hips").unwrap();
    assert!(vec3_approx(hips.position, Vec3::new(0.0, 1.0, 0.0)));
    assert!(quat_approx(hips.rotation, Quat::IDENTITY));
    assert_eq!(hips.scale, Vec3::ONE);

    let hand = description.find("LeftHand").unwrap();
    assert!(vec3_approx(hand.position, Vec3::new(0.65, 1.5, 0.0)), "{:?}", hand.position);

    let root = description.root.unwrap();
    assert!(vec3_approx(root.position, Vec3::new(1.0, 0.0, 2.0)));
    assert!(quat_approx(root.rotation, root_rotation));
}

#[test]
fn reset_falls_back_to_template_skeleton() {
    let (scene, mut rig) = rig();
    let template = rig.setting.template.as_mut().unwrap();
    template.human.push(HumanBoneMapping {
        human_name: "Jaw".into(),
        bone_name: "JawBone".into(),
    });
    template.human.push(HumanBoneMapping {
        human_name: "LeftEye".into(),
        bone_name: "Nowhere".into(),
    });
    template.skeleton.push(SkeletonBone {
        name: "JawBone".into(),
        position: Vec3::new(0.0, 1.6, 0.05),
        rotation: Quat::from_rotation_x(0.1),
        scale: Vec3::splat(2.0),
    });

    let written = reset_avatar(&scene, rig.root, &mut rig.setting);

    assert_eq!(written, registry_names().len() + 1);
    let jaw = rig.setting.avatar_description.find("Jaw").unwrap();
    assert_eq!(jaw.position, Vec3::new(0.0, 1.6, 0.05));
    assert_eq!(jaw.scale, Vec3::splat(2.0));
    assert!(rig.setting.avatar_description.find("LeftEye").is_none());
}

#[test]
fn reset_without_template_changes_nothing() {
    let (scene, mut rig) = rig();
    rig.setting.template = None;
    let before = rig.setting.avatar_description.clone();

    assert_eq!(reset_avatar(&scene, rig.root, &mut rig.setting), 0);
    assert_eq!(rig.setting.avatar_description, before);
}

#[test]
fn save_then_load_restores_pose_under_moved_root() {
    let (mut scene, mut rig) = rig();
    scene.set_world_position(rig.root, Vec3::new(-2.0, 0.5, 0.0));
    scene.set_world_rotation(rig.root, Quat::from_rotation_y(0.8));
    scene.set_rotation(rig.bone(&scene, "LeftUpperArm"), Quat::from_rotation_z(-0.9));
    scene.set_rotation(rig.bone(&scene, "Spine"), Quat::from_rotation_x(0.25));

    let saved = save_avatar(&scene, rig.root, &mut rig.setting);
    assert_eq!(saved, registry_names().len());

    let expected: Vec<(Vec3, Quat)> = registry_names()
        .iter()
        .map(|n| {
            let node = rig.bone(&scene, n);
            (
                scene.world_position(node).unwrap(),
                scene.world_rotation(node).unwrap(),
            )
        })
        .collect();

    // Disturb the pose, then load it back.
    scene.set_rotation(rig.bone(&scene, "LeftUpperArm"), Quat::IDENTITY);
    scene.set_rotation(rig.bone(&scene, "Spine"), Quat::from_rotation_z(1.0));
    let command = load_avatar(&mut scene, rig.root, &rig.setting);
    assert_eq!(command.len(), registry_names().len());

    for (name, (position, rotation)) in registry_names().iter().zip(&expected) {
        let node = rig.bone(&scene, name);
        assert!(vec3_approx(scene.world_position(node).unwrap(), *position), "{name}");
        assert!(quat_approx(scene.world_rotation(node).unwrap(), *rotation), "{name}");
    }

    command.undo(&mut scene);
    let spine = scene.local_rotation(rig.bone(&scene, "Spine")).unwrap();
    assert!(quat_approx(spine, Quat::from_rotation_z(1.0)));
}

#[test]
fn save_keeps_values_for_missing_nodes() {
    let (mut scene, mut rig) = rig();
    let stored = rig.setting.avatar_description.find("Head").unwrap().clone();
    let head = rig.bone(&scene, "Head");
    scene.remove_node(head);
    scene.set_rotation(rig.bone(&scene, "Neck"), Quat::from_rotation_x(0.3));

    let saved = save_avatar(&scene, rig.root, &mut rig.setting);

    assert_eq!(saved, registry_names().len() - 1);
    assert_eq!(rig.setting.avatar_description.find("Head"), Some(&stored));
}
