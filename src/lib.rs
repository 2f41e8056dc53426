#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! FollowMe: humanoid skeleton and blend-shape retargeting between avatar rigs.
//!
//! This crate re-exports the workspace members:
//! - [`core`]: error type, host traits and rotation math
//! - [`scene`]: a slotmap-backed reference host
//! - [`retarget`]: snapshots, retargeters, authoring tools and the frame driver
//!
//! Most users only need the [`prelude`].

pub use followme_core as core;
pub use followme_retarget as retarget;
pub use followme_scene as scene;

pub use glam;

pub use followme_core::{
    BlendShapeHost, BlendShapeMesh, FollowMeError, LocalTransform, RestPose, Result,
    TransformHierarchy,
};
pub use followme_retarget::{
    AvatarDescription, AvatarHumanBone, AvatarRetarget, AvatarSetting, BlendShapeMappingSettings,
    BlendShapeToBoneSettings, BoneId, BoneRegistry, EditCommand, RetargetConfig,
    SkeletonRetargeter, SkeletonSnapshot,
};
pub use followme_scene::{BlendShapeSet, Node, NodeHandle, Scene};

pub mod prelude {
    pub use followme_core::{
        BlendShapeHost, BlendShapeMesh, FollowMeError, LocalTransform, RestPose,
        TransformHierarchy, math,
    };
    pub use followme_retarget::{
        AvatarBinding, AvatarDescription, AvatarHumanBone, AvatarRetarget, AvatarSetting,
        BlendShapeMappingSetting, BlendShapeMappingSettings, BlendShapeRetargeter,
        BlendShapeToBoneSetting, BlendShapeToBoneSettings, BoneId, BoneRegistry, EditCommand,
        EulerAxis, FrameStats, HumanBoneMapping, HumanDescription, PoseSample, RetargetConfig,
        SkeletonBone, SkeletonRetargeter, SkeletonSnapshot, align_skeleton, auto_mapping,
        build_mapping, inverse_mapping, load_avatar, mirror_pose, reset_avatar, retarget,
        save_avatar, update_bone_from_weights, update_weights,
    };
    pub use followme_scene::{BlendShapeSet, Node, NodeHandle, Scene, Transform};
    pub use glam::{Quat, Vec3};
}
