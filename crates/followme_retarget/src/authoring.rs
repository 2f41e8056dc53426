//! Editor-time skeleton tools.
//!
//! - [`mirror_pose`]: copy local rotations across the sagittal plane.
//! - [`align_skeleton`]: turn target limbs to point like the source's.
//! - [`reset_avatar`], [`save_avatar`]: capture rest poses into an
//!   [`AvatarSetting`].
//! - [`load_avatar`]: push a stored rest pose back onto the hierarchy.
//!
//! Tools that write the hierarchy return an [`EditCommand`]. Missing bones
//! only skip the affected step.

use std::fmt::Debug;
use std::hash::Hash;

use followme_core::{RestPose, TransformHierarchy, math};
use glam::Vec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::avatar::{AvatarHumanBone, AvatarSetting, SkeletonBone};
use crate::bones::{BoneId, BoneId as B, MIRROR_PAIRS};
use crate::edit::EditCommand;
use crate::name_index::NameIndex;
use crate::snapshot::{PoseSample, SkeletonSnapshot, depth};

// ============================================================================
// Mirror
// ============================================================================

/// Copies every bilateral pair's local rotation from one side to the other.
///
/// With `left_to_right` the left bone is read and the right bone written,
/// otherwise the reverse. Pairs with an unresolved side are skipped.
pub fn mirror_pose<T>(
    host: &mut T,
    snapshot: &SkeletonSnapshot<T::Handle>,
    left_to_right: bool,
) -> EditCommand<T::Handle>
where
    T: TransformHierarchy,
{
    let mut command = EditCommand::new("Mirror Pose");

    for &(left, right) in MIRROR_PAIRS {
        let (from, to) = if left_to_right {
            (left, right)
        } else {
            (right, left)
        };
        let (Some(from_node), Some(to_node)) = (snapshot.node_of(from), snapshot.node_of(to))
        else {
            continue;
        };
        let (Some(source), Some(mut local)) =
            (host.local_rotation(from_node), host.local_transform(to_node))
        else {
            continue;
        };
        local.rotation = math::mirror_rotation(source);
        command.apply(host, to_node, local);
    }

    log::debug!("Mirrored {} bones", command.len());
    command
}

// ============================================================================
// Align
// ============================================================================

/// One alignment: turn `bone` so that it points at the centroid of `toward`.
#[derive(Debug, Clone, Copy)]
pub struct AlignStep {
    pub bone: BoneId,
    pub toward: &'static [BoneId],
}

const fn step(bone: BoneId, toward: &'static [BoneId]) -> AlignStep {
    AlignStep { bone, toward }
}

/// Alignment order: each limb root to tip, left side first.
pub const ALIGN_STEPS: &[AlignStep] = &[
    step(B::LeftShoulder, &[B::LeftUpperArm]),
    step(B::LeftUpperArm, &[B::LeftLowerArm]),
    step(B::LeftLowerArm, &[B::LeftHand]),
    step(B::LeftUpperLeg, &[B::LeftLowerLeg]),
    step(B::LeftLowerLeg, &[B::LeftFoot]),
    step(
        B::LeftHand,
        &[
            B::LeftThumbProximal,
            B::LeftIndexProximal,
            B::LeftMiddleProximal,
            B::LeftRingProximal,
            B::LeftLittleProximal,
        ],
    ),
    step(B::LeftThumbProximal, &[B::LeftThumbIntermediate]),
    step(B::LeftThumbIntermediate, &[B::LeftThumbDistal]),
    step(B::LeftIndexProximal, &[B::LeftIndexIntermediate]),
    step(B::LeftIndexIntermediate, &[B::LeftIndexDistal]),
    step(B::LeftMiddleProximal, &[B::LeftMiddleIntermediate]),
    step(B::LeftMiddleIntermediate, &[B::LeftMiddleDistal]),
    step(B::LeftRingProximal, &[B::LeftRingIntermediate]),
    step(B::LeftRingIntermediate, &[B::LeftRingDistal]),
    step(B::LeftLittleProximal, &[B::LeftLittleIntermediate]),
    step(B::LeftLittleIntermediate, &[B::LeftLittleDistal]),
    step(B::RightShoulder, &[B::RightUpperArm]),
    step(B::RightUpperArm, &[B::RightLowerArm]),
    step(B::RightLowerArm, &[B::RightHand]),
    step(B::RightUpperLeg, &[B::RightLowerLeg]),
    step(B::RightLowerLeg, &[B::RightFoot]),
    step(
        B::RightHand,
        &[
            B::RightThumbProximal,
            B::RightIndexProximal,
            B::RightMiddleProximal,
            B::RightRingProximal,
            B::RightLittleProximal,
        ],
    ),
    step(B::RightThumbProximal, &[B::RightThumbIntermediate]),
    step(B::RightThumbIntermediate, &[B::RightThumbDistal]),
    step(B::RightIndexProximal, &[B::RightIndexIntermediate]),
    step(B::RightIndexIntermediate, &[B::RightIndexDistal]),
    step(B::RightMiddleProximal, &[B::RightMiddleIntermediate]),
    step(B::RightMiddleIntermediate, &[B::RightMiddleDistal]),
    step(B::RightRingProximal, &[B::RightRingIntermediate]),
    step(B::RightRingIntermediate, &[B::RightRingDistal]),
    step(B::RightLittleProximal, &[B::RightLittleIntermediate]),
    step(B::RightLittleIntermediate, &[B::RightLittleDistal]),
];

/// Rotates target limbs so that each bone points the way the source's does.
///
/// The source is read from `source_pose` (sampled from `source`); the target
/// is read live, so every step sees the result of the steps before it.
pub fn align_skeleton<S, T>(
    source: &SkeletonSnapshot<S>,
    source_pose: &PoseSample,
    target: &SkeletonSnapshot<T::Handle>,
    host: &mut T,
) -> EditCommand<T::Handle>
where
    S: Copy + Eq + Hash + Debug,
    T: TransformHierarchy,
{
    let mut command = EditCommand::new("Align Skeleton");
    for step in ALIGN_STEPS {
        if !align_step(step, source, source_pose, target, host, &mut command) {
            log::trace!("Align skipped for {:?}", step.bone);
        }
    }
    command
}

fn align_step<S, T>(
    step: &AlignStep,
    source: &SkeletonSnapshot<S>,
    source_pose: &PoseSample,
    target: &SkeletonSnapshot<T::Handle>,
    host: &mut T,
    command: &mut EditCommand<T::Handle>,
) -> bool
where
    S: Copy + Eq + Hash + Debug,
    T: TransformHierarchy,
{
    let source_position = |bone: BoneId| {
        source
            .index_of(bone)
            .and_then(|i| source_pose.bone(i))
            .map(|p| p.position)
    };

    let Some(node) = target.node_of(step.bone) else {
        return false;
    };
    let (Some(source_origin), Some(target_origin)) =
        (source_position(step.bone), host.world_position(node))
    else {
        return false;
    };

    let mut source_points: SmallVec<[Vec3; 5]> = SmallVec::new();
    let mut target_points: SmallVec<[Vec3; 5]> = SmallVec::new();
    for &child in step.toward {
        let Some(source_point) = source_position(child) else {
            return false;
        };
        let Some(target_point) = target
            .node_of(child)
            .and_then(|n| host.world_position(n))
        else {
            return false;
        };
        source_points.push(source_point);
        target_points.push(target_point);
    }

    let source_dir = centroid(&source_points) - source_origin;
    let target_dir = centroid(&target_points) - target_origin;

    let (Some(local_target), Some(local_source), Some(mut local)) = (
        host.inverse_transform_direction(node, target_dir),
        host.inverse_transform_direction(node, source_dir),
        host.local_transform(node),
    ) else {
        return false;
    };

    local.rotation = (local.rotation * math::from_to_rotation(local_target, local_source)).normalize();
    command.apply(host, node, local)
}

fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f32;
    points.iter().copied().sum::<Vec3>() / count
}

// ============================================================================
// Reset / Save / Load
// ============================================================================

/// A bone's root-relative rest pose: position in root space and rotation as
/// `bone_world * inverse(root_world)`.
fn capture<T: TransformHierarchy>(
    host: &T,
    root: T::Handle,
    node: T::Handle,
) -> Option<(RestPose, Vec3)> {
    let position = host.inverse_transform_point(root, host.world_position(node)?)?;
    let rotation = host.world_rotation(node)? * host.world_rotation(root)?.inverse();
    let scale = host.local_transform(node)?.scale;
    Some((RestPose::new(position, rotation.normalize()), scale))
}

fn capture_root<T: TransformHierarchy>(host: &T, root: T::Handle) -> Option<RestPose> {
    Some(RestPose::new(
        host.world_position(root)?,
        host.world_rotation(root)?,
    ))
}

/// Rebuilds the avatar description from the setting's template rig.
///
/// Each template mapping is sampled from the live node when one exists under
/// `root`, otherwise from the template skeleton. Mappings found in neither
/// are dropped. Also records the root's current world pose.
///
/// Returns the number of bones written; `0` without a template.
pub fn reset_avatar<T>(host: &T, root: T::Handle, setting: &mut AvatarSetting) -> usize
where
    T: TransformHierarchy,
{
    let Some(template) = setting.template.as_ref() else {
        log::warn!("Reset avatar: no template rig, nothing to do");
        return 0;
    };

    let mut skeleton: FxHashMap<&str, &SkeletonBone> = FxHashMap::default();
    for bone in &template.skeleton {
        skeleton.entry(bone.name.as_str()).or_insert(bone);
    }
    let index = NameIndex::build(host, root);

    let mut human_bones = Vec::with_capacity(template.human.len());
    for mapping in &template.human {
        let live = index
            .get(&mapping.bone_name)
            .and_then(|node| capture(host, root, node));
        let (rest, scale) = match (live, skeleton.get(mapping.bone_name.as_str())) {
            (Some(sampled), _) => sampled,
            (None, Some(bone)) => (RestPose::new(bone.position, bone.rotation), bone.scale),
            (None, None) => {
                log::warn!(
                    "Reset avatar: bone '{}' ({}) not found in hierarchy or template",
                    mapping.bone_name,
                    mapping.human_name
                );
                continue;
            }
        };
        let mut bone = AvatarHumanBone::new(
            &mapping.human_name,
            &mapping.bone_name,
            rest.position,
            rest.rotation,
        );
        bone.scale = scale;
        human_bones.push(bone);
    }

    let written = human_bones.len();
    setting.avatar_description.human_bones = human_bones;
    setting.avatar_description.root = capture_root(host, root);
    log::debug!("Reset avatar: {written} bones");
    written
}

/// Re-samples the current pose of every described bone found under `root`.
///
/// Bones not found keep their stored values. Returns the number updated.
pub fn save_avatar<T>(host: &T, root: T::Handle, setting: &mut AvatarSetting) -> usize
where
    T: TransformHierarchy,
{
    let index = NameIndex::build(host, root);
    let mut written = 0;

    for bone in &mut setting.avatar_description.human_bones {
        let Some((rest, scale)) = index
            .get(&bone.bone_name)
            .and_then(|node| capture(host, root, node))
        else {
            log::debug!("Save avatar: bone '{}' not found", bone.bone_name);
            continue;
        };
        bone.position = rest.position;
        bone.rotation = rest.rotation;
        bone.scale = scale;
        written += 1;
    }

    if let Some(rest) = capture_root(host, root) {
        setting.avatar_description.root = Some(rest);
    }
    written
}

/// Poses every described bone found under `root` at its stored rest pose.
///
/// Inverse of [`save_avatar`]: world position is `root * position` and world
/// rotation is `rotation * root_rotation`. Parents are written before
/// children so stored world values are reproduced exactly.
pub fn load_avatar<T>(host: &mut T, root: T::Handle, setting: &AvatarSetting) -> EditCommand<T::Handle>
where
    T: TransformHierarchy,
{
    let mut command = EditCommand::new("Load Avatar");
    let index = NameIndex::build(&*host, root);

    let mut order: Vec<(usize, T::Handle, &AvatarHumanBone)> = setting
        .avatar_description
        .human_bones
        .iter()
        .filter_map(|bone| {
            let node = index.get(&bone.bone_name)?;
            Some((depth(&*host, node), node, bone))
        })
        .collect();
    order.sort_by_key(|&(depth, _, _)| depth);

    for (_, node, bone) in order {
        let (Some(previous), Some(position), Some(root_rotation)) = (
            host.local_transform(node),
            host.transform_point(root, bone.position),
            host.world_rotation(root),
        ) else {
            continue;
        };
        host.set_world_position(node, position);
        host.set_world_rotation(node, bone.rotation * root_rotation);
        let Some(mut new) = host.local_transform(node) else {
            continue;
        };
        new.scale = bone.scale;
        host.set_local_transform(node, previous);
        command.apply(host, node, new);
    }

    command
}
