//! Persisted avatar configuration.
//!
//! An [`AvatarSetting`] is authored once per avatar asset (by the
//! reset/save tools in [`crate::authoring`]) and is read-only during
//! playback.

use followme_core::RestPose;
use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One bone actually present on a specific avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarHumanBone {
    /// Canonical human name (joins against the bone registry).
    pub human_name: String,
    /// Scene node name to resolve at runtime.
    pub bone_name: String,
    /// Rest position in avatar-root space.
    pub position: Vec3,
    /// Rest rotation, stored as `bone_world * inverse(root_world)`.
    pub rotation: Quat,
    /// Rest local scale.
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl AvatarHumanBone {
    #[must_use]
    pub fn new(human_name: &str, bone_name: &str, position: Vec3, rotation: Quat) -> Self {
        Self {
            human_name: human_name.to_string(),
            bone_name: bone_name.to_string(),
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    #[must_use]
    pub fn rest(&self) -> RestPose {
        RestPose::new(self.position, self.rotation)
    }
}

/// Ordered bone list of one avatar, plus the root's rest pose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarDescription {
    #[serde(default)]
    pub human_bones: Vec<AvatarHumanBone>,
    /// World pose of the avatar root when the description was captured.
    /// When absent on either avatar, the root position is not retargeted.
    #[serde(default)]
    pub root: Option<RestPose>,
}

impl AvatarDescription {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.human_bones.is_empty()
    }

    #[must_use]
    pub fn find(&self, human_name: &str) -> Option<&AvatarHumanBone> {
        self.human_bones.iter().find(|b| b.human_name == human_name)
    }

    /// World-space rest positions for every bone, given the root's world matrix.
    #[must_use]
    pub fn rest_points(&self, root_matrix: &Affine3A) -> Vec<Vec3> {
        self.human_bones
            .iter()
            .map(|b| root_matrix.transform_point3(b.position))
            .collect()
    }
}

/// Human-name → scene-bone-name pair of a template rig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanBoneMapping {
    pub human_name: String,
    pub bone_name: String,
}

/// Template skeleton bone, used when the live hierarchy lacks the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonBone {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

/// Template rig description consumed by the reset tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanDescription {
    #[serde(default)]
    pub human: Vec<HumanBoneMapping>,
    #[serde(default)]
    pub skeleton: Vec<SkeletonBone>,
}

impl HumanDescription {
    /// Adds a mapping whose name is both the human and the bone name.
    pub fn push_identity(&mut self, name: &str) {
        self.human.push(HumanBoneMapping {
            human_name: name.to_string(),
            bone_name: name.to_string(),
        });
    }
}

/// Persisted per-avatar configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarSetting {
    /// Path (relative to the avatar root) of the body object owning the main
    /// blend-shape mesh.
    #[serde(default)]
    pub body_name: String,
    /// Paths of auxiliary objects with their own blend-shape meshes.
    #[serde(default)]
    pub part_names: Vec<String>,
    /// Template rig used by the reset tool.
    #[serde(default)]
    pub template: Option<HumanDescription>,
    #[serde(default)]
    pub avatar_description: AvatarDescription,
}
