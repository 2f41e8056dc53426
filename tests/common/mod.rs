//! Shared fixtures: a small T-posed humanoid built in a `Scene`.

#![allow(dead_code)]

use followme::prelude::*;

pub const EPSILON: f32 = 1e-4;

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

pub fn quat_approx(a: Quat, b: Quat) -> bool {
    math::rotation_angle(a, b) < 1e-3
}

/// `(human name, parent human name, local offset)` of the fixture skeleton.
/// An empty parent means the avatar root.
const LAYOUT: &[(&str, &str, [f32; 3])] = &[
    ("Hips", "", [0.0, 1.0, 0.0]),
    ("Spine", "Hips", [0.0, 0.1, 0.0]),
    ("Chest", "Spine", [0.0, 0.15, 0.0]),
    ("UpperChest", "Chest", [0.0, 0.15, 0.0]),
    ("Neck", "UpperChest", [0.0, 0.15, 0.0]),
    ("Head", "Neck", [0.0, 0.1, 0.0]),
    ("LeftUpperLeg", "Hips", [0.1, -0.05, 0.0]),
    ("LeftLowerLeg", "LeftUpperLeg", [0.0, -0.45, 0.0]),
    ("LeftFoot", "LeftLowerLeg", [0.0, -0.45, 0.0]),
    ("LeftToes", "LeftFoot", [0.0, -0.05, 0.12]),
    ("RightUpperLeg", "Hips", [-0.1, -0.05, 0.0]),
    ("RightLowerLeg", "RightUpperLeg", [0.0, -0.45, 0.0]),
    ("RightFoot", "RightLowerLeg", [0.0, -0.45, 0.0]),
    ("RightToes", "RightFoot", [0.0, -0.05, 0.12]),
    ("LeftShoulder", "UpperChest", [0.05, 0.1, 0.0]),
    ("LeftUpperArm", "LeftShoulder", [0.1, 0.0, 0.0]),
    ("LeftLowerArm", "LeftUpperArm", [0.25, 0.0, 0.0]),
    ("LeftHand", "LeftLowerArm", [0.25, 0.0, 0.0]),
    ("Left Thumb Proximal", "LeftHand", [0.03, 0.0, 0.03]),
    ("Left Thumb Intermediate", "Left Thumb Proximal", [0.03, 0.0, 0.0]),
    ("Left Thumb Distal", "Left Thumb Intermediate", [0.02, 0.0, 0.0]),
    ("Left Index Proximal", "LeftHand", [0.08, 0.0, 0.02]),
    ("Left Index Intermediate", "Left Index Proximal", [0.03, 0.0, 0.0]),
    ("Left Index Distal", "Left Index Intermediate", [0.02, 0.0, 0.0]),
    ("Left Middle Proximal", "LeftHand", [0.08, 0.0, 0.0]),
    ("Left Middle Intermediate", "Left Middle Proximal", [0.035, 0.0, 0.0]),
    ("Left Middle Distal", "Left Middle Intermediate", [0.02, 0.0, 0.0]),
    ("Left Ring Proximal", "LeftHand", [0.075, 0.0, -0.02]),
    ("Left Ring Intermediate", "Left Ring Proximal", [0.03, 0.0, 0.0]),
    ("Left Ring Distal", "Left Ring Intermediate", [0.02, 0.0, 0.0]),
    ("Left Little Proximal", "LeftHand", [0.07, 0.0, -0.04]),
    ("Left Little Intermediate", "Left Little Proximal", [0.025, 0.0, 0.0]),
    ("Left Little Distal", "Left Little Intermediate", [0.015, 0.0, 0.0]),
    ("RightShoulder", "UpperChest", [-0.05, 0.1, 0.0]),
    ("RightUpperArm", "RightShoulder", [-0.1, 0.0, 0.0]),
    ("RightLowerArm", "RightUpperArm", [-0.25, 0.0, 0.0]),
    ("RightHand", "RightLowerArm", [-0.25, 0.0, 0.0]),
    ("Right Thumb Proximal", "RightHand", [-0.03, 0.0, 0.03]),
    ("Right Thumb Intermediate", "Right Thumb Proximal", [-0.03, 0.0, 0.0]),
    ("Right Thumb Distal", "Right Thumb Intermediate", [-0.02, 0.0, 0.0]),
    ("Right Index Proximal", "RightHand", [-0.08, 0.0, 0.02]),
    ("Right Index Intermediate", "Right Index Proximal", [-0.03, 0.0, 0.0]),
    ("Right Index Distal", "Right Index Intermediate", [-0.02, 0.0, 0.0]),
    ("Right Middle Proximal", "RightHand", [-0.08, 0.0, 0.0]),
    ("Right Middle Intermediate", "Right Middle Proximal", [-0.035, 0.0, 0.0]),
    ("Right Middle Distal", "Right Middle Intermediate", [-0.02, 0.0, 0.0]),
    ("Right Ring Proximal", "RightHand", [-0.075, 0.0, -0.02]),
    ("Right Ring Intermediate", "Right Ring Proximal", [-0.03, 0.0, 0.0]),
    ("Right Ring Distal", "Right Ring Intermediate", [-0.02, 0.0, 0.0]),
    ("Right Little Proximal", "RightHand", [-0.07, 0.0, -0.04]),
    ("Right Little Intermediate", "Right Little Proximal", [-0.025, 0.0, 0.0]),
    ("Right Little Distal", "Right Little Intermediate", [-0.015, 0.0, 0.0]),
];

/// A humanoid avatar living in a `Scene`.
pub struct Rig {
    pub root: NodeHandle,
    pub body: NodeHandle,
    pub setting: AvatarSetting,
}

impl Rig {
    /// Node of a bone, by human name.
    pub fn bone(&self, scene: &Scene, human_name: &str) -> NodeHandle {
        let entry = self
            .setting
            .avatar_description
            .find(human_name)
            .unwrap_or_else(|| panic!("no bone {human_name}"));
        scene
            .find_by_name(self.root, &entry.bone_name)
            .unwrap_or_else(|| panic!("node {} missing", entry.bone_name))
    }

    pub fn snapshot(&self, scene: &Scene) -> SkeletonSnapshot<NodeHandle> {
        SkeletonSnapshot::build(
            scene,
            &BoneRegistry::humanoid(),
            &self.setting.avatar_description,
            self.root,
        )
        .expect("snapshot")
    }
}

/// Builds a humanoid under a new root node.
///
/// Node names are `prefix + human name`; every offset is multiplied by
/// `scale`. The avatar description is captured with `reset_avatar`.
pub fn build_rig(scene: &mut Scene, root_name: &str, prefix: &str, scale: f32) -> Rig {
    let root = scene.create_node_with_name(root_name);
    let mut template = HumanDescription::default();

    for &(name, parent, offset) in LAYOUT {
        let parent = if parent.is_empty() {
            root
        } else {
            scene
                .find_by_name(root, &format!("{prefix}{parent}"))
                .expect("parent created first")
        };
        let node_name = format!("{prefix}{name}");
        scene.spawn_child(parent, &node_name, Vec3::from(offset) * scale);
        if prefix.is_empty() {
            template.push_identity(name);
        } else {
            template.human.push(HumanBoneMapping {
                human_name: name.to_string(),
                bone_name: node_name,
            });
        }
    }

    let body = scene.spawn_child(root, "Body", Vec3::ZERO);

    let mut setting = AvatarSetting {
        body_name: "Body".to_string(),
        template: Some(template),
        ..Default::default()
    };
    reset_avatar(scene, root, &mut setting);

    Rig {
        root,
        body,
        setting,
    }
}

/// Every human name the fixture knows, in registry order.
pub fn registry_names() -> Vec<&'static str> {
    BoneRegistry::humanoid().enabled().map(|b| b.name).collect()
}

/// Sets local rotations on `rig` and captures them as its new rest pose.
pub fn rest_with_rotations(scene: &mut Scene, rig: &mut Rig, rotations: &[(&str, Quat)]) {
    for &(name, rotation) in rotations {
        let node = rig.bone(scene, name);
        scene.set_rotation(node, rotation);
    }
    reset_avatar(&*scene, rig.root, &mut rig.setting);
}
