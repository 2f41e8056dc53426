#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Skeleton and blend-shape retargeting.
//!
//! - [`bones`]: the humanoid bone table that fixes retarget order
//! - [`avatar`]: persisted per-avatar rest poses and object names
//! - [`snapshot`]: registry-ordered resolved skeletons and pose samples
//! - [`skeleton`]: per-frame pose transfer
//! - [`blend_shape`]: weight remapping and weight-driven bone rotations
//! - [`mapping`]: generators for blend-shape mapping tables
//! - [`authoring`]: mirror, align, reset, save and load tools
//! - [`driver`]: the per-frame [`AvatarRetarget`] driver

pub mod authoring;
pub mod avatar;
pub mod binding;
pub mod blend_shape;
pub mod bones;
pub mod config;
pub mod driver;
pub mod edit;
pub mod mapping;
pub mod name_index;
pub mod skeleton;
pub mod snapshot;

pub use authoring::{align_skeleton, load_avatar, mirror_pose, reset_avatar, save_avatar};
pub use avatar::{
    AvatarDescription, AvatarHumanBone, AvatarSetting, HumanBoneMapping, HumanDescription,
    SkeletonBone,
};
pub use binding::AvatarBinding;
pub use blend_shape::{
    BlendShapeMappingSetting, BlendShapeMappingSettings, BlendShapeRetargeter,
    BlendShapeToBoneSetting, BlendShapeToBoneSettings, EulerAxis, blend_shape_names,
    update_bone_from_weights, update_weights, weight_by_name,
};
pub use bones::{BoneDescriptor, BoneId, BoneRegistry, MIRROR_PAIRS};
pub use config::RetargetConfig;
pub use driver::{AvatarRetarget, FrameStats};
pub use edit::{EditCommand, TransformPatch};
pub use mapping::{auto_mapping, build_mapping, inverse_mapping};
pub use name_index::NameIndex;
pub use skeleton::{SkeletonRetargeter, retarget};
pub use snapshot::{BonePose, PoseSample, SkeletonSnapshot, SnapshotBone};
