//! Skeleton snapshots and pose samples.
//!
//! A [`SkeletonSnapshot`] joins the bone registry, an [`AvatarDescription`]
//! and a live hierarchy into a registry-ordered array of resolved nodes and
//! rest poses. A [`PoseSample`] is the current world pose of a snapshot's
//! root and bones, copied out of the host so that the host can be written
//! while the sample is read.

use std::fmt::Debug;
use std::hash::Hash;

use followme_core::{FollowMeError, RestPose, Result, TransformHierarchy};
use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::avatar::AvatarDescription;
use crate::bones::{BoneId, BoneRegistry};
use crate::name_index::NameIndex;

/// One registry slot of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotBone<H> {
    pub bone: BoneId,
    /// `None` when the description has no entry for this bone or the node
    /// could not be found. The slot is kept either way.
    pub node: Option<H>,
    /// Rest pose from the description (identity when the bone is absent).
    pub rest: RestPose,
}

/// Registry-ordered, resolved view of one avatar's skeleton.
#[derive(Debug, Clone)]
pub struct SkeletonSnapshot<H> {
    root: Option<H>,
    root_rest: RestPose,
    // Whether `root_rest` came from the description.
    root_recorded: bool,
    bones: Vec<SnapshotBone<H>>,
    // Indices of resolved bones, parents before children.
    apply_order: Vec<usize>,
}

impl<H> SkeletonSnapshot<H>
where
    H: Copy + Eq + Hash + Debug,
{
    /// An unbuilt snapshot. Retargeting against it is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: None,
            root_rest: RestPose::IDENTITY,
            root_recorded: false,
            bones: Vec::new(),
            apply_order: Vec::new(),
        }
    }

    /// Builds a snapshot of the avatar under `root`.
    ///
    /// # Errors
    ///
    /// [`FollowMeError::EmptyAvatarDescription`] if the description has no
    /// bones, [`FollowMeError::MissingNode`] if `root` is not in the host.
    pub fn build<T>(
        hierarchy: &T,
        registry: &BoneRegistry,
        description: &AvatarDescription,
        root: H,
    ) -> Result<Self>
    where
        T: TransformHierarchy<Handle = H>,
    {
        let mut snapshot = Self::empty();
        let mut index = NameIndex::new();
        snapshot.rebuild_into(hierarchy, registry, description, root, &mut index)?;
        Ok(snapshot)
    }

    /// Rebuilds this snapshot in place, reusing its buffers and `index`.
    ///
    /// On error the snapshot is left empty.
    ///
    /// # Errors
    ///
    /// See [`SkeletonSnapshot::build`].
    pub fn rebuild_into<T>(
        &mut self,
        hierarchy: &T,
        registry: &BoneRegistry,
        description: &AvatarDescription,
        root: H,
        index: &mut NameIndex<H>,
    ) -> Result<()>
    where
        T: TransformHierarchy<Handle = H>,
    {
        self.root = None;
        self.root_recorded = false;
        self.bones.clear();
        self.apply_order.clear();

        if description.is_empty() {
            return Err(FollowMeError::EmptyAvatarDescription);
        }

        let (Some(position), Some(rotation)) =
            (hierarchy.world_position(root), hierarchy.world_rotation(root))
        else {
            return Err(FollowMeError::MissingNode(format!("avatar root {root:?}")));
        };
        let root_rest = description
            .root
            .unwrap_or_else(|| RestPose::new(position, rotation));

        index.rebuild(hierarchy, root);

        // First entry wins for repeated human names.
        let mut by_human_name: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, bone) in description.human_bones.iter().enumerate() {
            by_human_name.entry(bone.human_name.as_str()).or_insert(i);
        }

        for descriptor in registry.enabled() {
            let slot = match by_human_name.get(descriptor.name) {
                Some(&i) => {
                    let entry = &description.human_bones[i];
                    let node = index.get(&entry.bone_name);
                    if node.is_none() {
                        log::trace!(
                            "Bone '{}' ({}) not found under avatar root",
                            entry.bone_name,
                            descriptor.name
                        );
                    }
                    SnapshotBone {
                        bone: descriptor.bone,
                        node,
                        rest: entry.rest(),
                    }
                }
                None => SnapshotBone {
                    bone: descriptor.bone,
                    node: None,
                    rest: RestPose::IDENTITY,
                },
            };
            self.bones.push(slot);
        }

        self.apply_order.extend(
            self.bones
                .iter()
                .enumerate()
                .filter(|(_, b)| b.node.is_some())
                .map(|(i, _)| i),
        );
        let bones = &self.bones;
        self.apply_order
            .sort_by_key(|&i| bones[i].node.map_or(0, |n| depth(hierarchy, n)));

        self.root = Some(root);
        self.root_rest = root_rest;
        self.root_recorded = description.root.is_some();
        Ok(())
    }

    /// `true` once a build has succeeded.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.root.is_some()
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<H> {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn root_rest(&self) -> RestPose {
        self.root_rest
    }

    /// `true` when the root rest pose was read from the description rather
    /// than from the root's pose at build time.
    #[inline]
    #[must_use]
    pub fn has_recorded_root(&self) -> bool {
        self.root_recorded
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[SnapshotBone<H>] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Resolved bone indices ordered parents first.
    #[inline]
    #[must_use]
    pub fn apply_order(&self) -> &[usize] {
        &self.apply_order
    }

    #[must_use]
    pub fn index_of(&self, bone: BoneId) -> Option<usize> {
        self.bones.iter().position(|b| b.bone == bone)
    }

    #[must_use]
    pub fn node_of(&self, bone: BoneId) -> Option<H> {
        self.bones.iter().find(|b| b.bone == bone).and_then(|b| b.node)
    }

    /// Checks that `other` was built from the same bone table.
    ///
    /// # Errors
    ///
    /// [`FollowMeError::RegistryMismatch`] when lengths or bone ids differ.
    pub fn check_aligned<G>(&self, other: &SkeletonSnapshot<G>) -> Result<()> {
        let aligned = self.bones.len() == other.bones.len()
            && self
                .bones
                .iter()
                .zip(&other.bones)
                .all(|(a, b)| a.bone == b.bone);
        if aligned {
            Ok(())
        } else {
            Err(FollowMeError::RegistryMismatch {
                source_len: self.bones.len(),
                target_len: other.bones.len(),
            })
        }
    }

    /// Reads the current world pose of the root and every resolved bone.
    ///
    /// Returns `false` and leaves `out` cleared if the snapshot is not built
    /// or its root is gone.
    pub fn sample_into<T>(&self, hierarchy: &T, out: &mut PoseSample) -> bool
    where
        T: TransformHierarchy<Handle = H>,
    {
        out.bones.clear();
        let Some(root) = self.root else {
            return false;
        };
        let (Some(matrix), Some(rotation)) =
            (hierarchy.world_matrix(root), hierarchy.world_rotation(root))
        else {
            return false;
        };
        out.root_matrix = matrix;
        out.root_rotation = rotation;
        out.root_position = Vec3::from(matrix.translation);

        out.bones.extend(self.bones.iter().map(|b| {
            let node = b.node?;
            let matrix = hierarchy.world_matrix(node)?;
            let rotation = hierarchy.world_rotation(node)?;
            Some(BonePose {
                position: Vec3::from(matrix.translation),
                rotation,
            })
        }));
        true
    }

    #[must_use]
    pub fn sample<T>(&self, hierarchy: &T) -> Option<PoseSample>
    where
        T: TransformHierarchy<Handle = H>,
    {
        let mut sample = PoseSample::default();
        self.sample_into(hierarchy, &mut sample).then_some(sample)
    }

    /// `(parent_position, bone_position)` world-space segments for every
    /// resolved bone that has a parent. Useful for drawing the rig.
    #[must_use]
    pub fn bone_segments<T>(&self, hierarchy: &T) -> Vec<(Vec3, Vec3)>
    where
        T: TransformHierarchy<Handle = H>,
    {
        self.bones
            .iter()
            .filter_map(|b| {
                let node = b.node?;
                let parent = hierarchy.parent(node)?;
                Some((
                    hierarchy.world_position(parent)?,
                    hierarchy.world_position(node)?,
                ))
            })
            .collect()
    }
}

impl<H> Default for SkeletonSnapshot<H>
where
    H: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::empty()
    }
}

/// Number of ancestors above `node`.
pub(crate) fn depth<T: TransformHierarchy>(hierarchy: &T, node: T::Handle) -> usize {
    let mut depth = 0;
    let mut current = hierarchy.parent(node);
    while let Some(parent) = current {
        depth += 1;
        current = hierarchy.parent(parent);
    }
    depth
}

/// World pose of one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Current world pose of a snapshot, index-aligned with its bones.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSample {
    pub root_matrix: Affine3A,
    pub root_position: Vec3,
    pub root_rotation: Quat,
    /// `None` for unresolved bones.
    pub bones: Vec<Option<BonePose>>,
}

impl PoseSample {
    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<BonePose> {
        self.bones.get(index).copied().flatten()
    }
}

impl Default for PoseSample {
    fn default() -> Self {
        Self {
            root_matrix: Affine3A::IDENTITY,
            root_position: Vec3::ZERO,
            root_rotation: Quat::IDENTITY,
            bones: Vec::new(),
        }
    }
}
