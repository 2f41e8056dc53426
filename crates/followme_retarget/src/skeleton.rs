//! Per-frame skeleton retargeting.
//!
//! The source pose is read into a [`PoseSample`] first and the target is
//! written afterwards, so both avatars may live in the same host.
//!
//! For every registry slot resolved on both sides:
//!
//! ```text
//! delta  = inverse(src_root_rot) * src_bone_rot * inverse(src_rest_rot)
//! target = tgt_root_rot * delta * tgt_rest_rot          (world rotation)
//! ```
//!
//! When both descriptions record a root rest pose, the root receives the
//! source's displacement from its rest position. The hips additionally
//! receive a root-relative position transfer. All other bones follow through
//! the hierarchy.

use std::fmt::Debug;
use std::hash::Hash;

use followme_core::{Result, TransformHierarchy};
use glam::Quat;

use crate::avatar::AvatarDescription;
use crate::bones::{BoneId, BoneRegistry};
use crate::name_index::NameIndex;
use crate::snapshot::{PoseSample, SkeletonSnapshot};

/// Writes the pose in `source_pose` onto the `target` avatar.
///
/// Returns `false` without writing when either snapshot is not built or the
/// sample does not match the source. Slots unresolved on either side are
/// skipped.
///
/// # Errors
///
/// [`FollowMeError::RegistryMismatch`](followme_core::FollowMeError::RegistryMismatch)
/// if the snapshots were built from different bone tables. Nothing is
/// written in that case.
pub fn retarget<S, T>(
    source: &SkeletonSnapshot<S>,
    source_pose: &PoseSample,
    target: &SkeletonSnapshot<T::Handle>,
    host: &mut T,
) -> Result<bool>
where
    S: Copy + Eq + Hash + Debug,
    T: TransformHierarchy,
{
    let mut rotations = Vec::new();
    retarget_with(source, source_pose, target, host, &mut rotations)
}

fn retarget_with<S, T>(
    source: &SkeletonSnapshot<S>,
    source_pose: &PoseSample,
    target: &SkeletonSnapshot<T::Handle>,
    host: &mut T,
    rotations: &mut Vec<Option<Quat>>,
) -> Result<bool>
where
    S: Copy + Eq + Hash + Debug,
    T: TransformHierarchy,
{
    let Some(target_root) = target.root() else {
        return Ok(false);
    };
    if !source.is_ready() || source_pose.bones.len() != source.len() {
        return Ok(false);
    }
    source.check_aligned(target)?;

    // Root displacement, rebased onto the target's rest position. Needs a
    // recorded rest on both sides.
    if source.has_recorded_root() && target.has_recorded_root() {
        let root_position =
            source_pose.root_position - source.root_rest().position + target.root_rest().position;
        host.set_world_position(target_root, root_position);
    }

    let (Some(target_root_rotation), Some(target_root_matrix)) = (
        host.world_rotation(target_root),
        host.world_matrix(target_root),
    ) else {
        return Ok(false);
    };
    let source_root_inverse = source_pose.root_rotation.inverse();
    let source_root_matrix_inverse = source_pose.root_matrix.inverse();

    rotations.clear();
    rotations.extend(
        source
            .bones()
            .iter()
            .zip(target.bones())
            .enumerate()
            .map(|(i, (src, tgt))| {
                tgt.node?;
                let pose = source_pose.bone(i)?;
                let delta = source_root_inverse * pose.rotation * src.rest.rotation.inverse();
                Some((target_root_rotation * delta * tgt.rest.rotation).normalize())
            }),
    );

    for &i in target.apply_order() {
        let (Some(rotation), Some(node)) = (rotations[i], target.bones()[i].node) else {
            continue;
        };
        host.set_world_rotation(node, rotation);

        if target.bones()[i].bone == BoneId::Hips
            && let Some(pose) = source_pose.bone(i)
        {
            let local = source_root_matrix_inverse.transform_point3(pose.position);
            let rebased = local - source.bones()[i].rest.position + target.bones()[i].rest.position;
            host.set_world_position(node, target_root_matrix.transform_point3(rebased));
        }
    }

    Ok(true)
}

/// Frame-to-frame retargeter that keeps its snapshot and sample buffers.
///
/// Both avatars are rebuilt from their descriptions every call, so
/// hierarchy changes between frames are picked up without extra bookkeeping.
#[derive(Debug)]
pub struct SkeletonRetargeter<H> {
    registry: BoneRegistry,
    index: NameIndex<H>,
    source: SkeletonSnapshot<H>,
    target: SkeletonSnapshot<H>,
    pose: PoseSample,
    rotations: Vec<Option<Quat>>,
}

impl<H> SkeletonRetargeter<H>
where
    H: Copy + Eq + Hash + Debug,
{
    #[must_use]
    pub fn new(registry: BoneRegistry) -> Self {
        Self {
            registry,
            index: NameIndex::new(),
            source: SkeletonSnapshot::empty(),
            target: SkeletonSnapshot::empty(),
            pose: PoseSample::default(),
            rotations: Vec::new(),
        }
    }

    /// Snapshots from the last call to [`SkeletonRetargeter::retarget`].
    #[must_use]
    pub fn snapshots(&self) -> (&SkeletonSnapshot<H>, &SkeletonSnapshot<H>) {
        (&self.source, &self.target)
    }

    /// Retargets the avatar under `source_root` onto the one under `target_root`.
    ///
    /// # Errors
    ///
    /// Returns the snapshot build error of either avatar, or a registry
    /// mismatch. The target is not touched when an error is returned.
    ///
    /// `Ok(false)` means the source pose could not be sampled and nothing
    /// was written.
    pub fn retarget<T>(
        &mut self,
        host: &mut T,
        source_description: &AvatarDescription,
        source_root: H,
        target_description: &AvatarDescription,
        target_root: H,
    ) -> Result<bool>
    where
        T: TransformHierarchy<Handle = H>,
    {
        self.source.rebuild_into(
            &*host,
            &self.registry,
            source_description,
            source_root,
            &mut self.index,
        )?;
        if !self.source.sample_into(&*host, &mut self.pose) {
            return Ok(false);
        }
        self.target.rebuild_into(
            &*host,
            &self.registry,
            target_description,
            target_root,
            &mut self.index,
        )?;

        retarget_with(
            &self.source,
            &self.pose,
            &self.target,
            host,
            &mut self.rotations,
        )
    }
}

impl<H> Default for SkeletonRetargeter<H>
where
    H: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new(BoneRegistry::humanoid())
    }
}
