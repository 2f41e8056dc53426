//! Per-frame retarget driver.
//!
//! [`AvatarRetarget`] ties a source and a target avatar to their
//! configuration and runs the stages in order each frame:
//!
//! 1. skeleton pose transfer,
//! 2. body blend-shape weights,
//! 3. bone rotations driven by the freshly written body weights,
//! 4. blend-shape weights of each part mesh, from the same source weights.
//!
//! Errors never leave [`AvatarRetarget::update`]; a failing stage is logged
//! and skipped.

use std::fmt::Debug;
use std::hash::Hash;

use followme_core::{BlendShapeHost, Result};

use crate::binding::AvatarBinding;
use crate::blend_shape::{
    BlendShapeMappingSettings, BlendShapeRetargeter, BlendShapeToBoneSettings,
    update_bone_from_weights,
};
use crate::bones::BoneRegistry;
use crate::config::RetargetConfig;
use crate::skeleton::SkeletonRetargeter;

/// What one call to [`AvatarRetarget::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// The skeleton pose was written to the target.
    pub skeleton: bool,
    pub channels_written: usize,
    pub bones_driven: usize,
}

/// Retargets one source avatar onto one target avatar, frame after frame.
#[derive(Debug)]
pub struct AvatarRetarget<H> {
    pub source: AvatarBinding<H>,
    pub target: AvatarBinding<H>,
    pub blend_shape_scale: f32,
    pub blend_shape_mappings: Vec<BlendShapeMappingSettings>,
    pub blend_shape_to_bones: Vec<BlendShapeToBoneSettings>,

    skeleton: SkeletonRetargeter<H>,
    blend_shapes: BlendShapeRetargeter,
}

impl<H> AvatarRetarget<H>
where
    H: Copy + Eq + Hash + Debug,
{
    /// Builds an unresolved driver; call [`AvatarRetarget::reset`] before
    /// the first update.
    #[must_use]
    pub fn new(source_root: H, target_root: H, config: RetargetConfig) -> Self {
        Self {
            source: AvatarBinding::new(source_root, config.source),
            target: AvatarBinding::new(target_root, config.target),
            blend_shape_scale: config.blend_shape_scale,
            blend_shape_mappings: config.blend_shape_mappings,
            blend_shape_to_bones: config.blend_shape_to_bones,
            skeleton: SkeletonRetargeter::new(BoneRegistry::humanoid()),
            blend_shapes: BlendShapeRetargeter::new(),
        }
    }

    /// Replaces the default humanoid bone table.
    #[must_use]
    pub fn with_registry(mut self, registry: BoneRegistry) -> Self {
        self.skeleton = SkeletonRetargeter::new(registry);
        self
    }

    /// Re-resolves body and part objects of both avatars.
    pub fn reset<T>(&mut self, host: &T)
    where
        T: BlendShapeHost<Handle = H>,
    {
        self.source.reset(host);
        self.target.reset(host);
    }

    #[must_use]
    pub fn skeleton(&self) -> &SkeletonRetargeter<H> {
        &self.skeleton
    }

    /// Runs one frame.
    pub fn update<T>(&mut self, host: &mut T) -> FrameStats
    where
        T: BlendShapeHost<Handle = H>,
    {
        let mut stats = FrameStats::default();

        match self.skeleton.retarget(
            host,
            &self.source.setting.avatar_description,
            self.source.root,
            &self.target.setting.avatar_description,
            self.target.root,
        ) {
            Ok(written) => stats.skeleton = written,
            Err(e) => log::warn!("Skeleton retarget skipped: {e}"),
        }

        let (Some(source_body), Some(target_body)) = (self.source.body(), self.target.body())
        else {
            log::trace!("Blend shape retarget skipped: body not bound");
            return stats;
        };

        match transfer_weights(
            &mut self.blend_shapes,
            host,
            source_body,
            target_body,
            &self.blend_shape_mappings,
            self.blend_shape_scale,
        ) {
            Ok(written) => stats.channels_written += written,
            Err(e) => log::warn!("Blend shape retarget skipped: {e}"),
        }

        stats.bones_driven = update_bone_from_weights(
            host,
            self.target.root,
            target_body,
            &self.blend_shape_to_bones,
        );

        for &part in self.target.parts() {
            match transfer_weights(
                &mut self.blend_shapes,
                host,
                source_body,
                part,
                &self.blend_shape_mappings,
                self.blend_shape_scale,
            ) {
                Ok(written) => stats.channels_written += written,
                Err(e) => log::warn!("Blend shape retarget skipped for part {part:?}: {e}"),
            }
        }

        stats
    }
}

/// Maps weights from the mesh on `source` to the mesh on `target` within one
/// host. Missing meshes write nothing.
fn transfer_weights<T: BlendShapeHost>(
    retargeter: &mut BlendShapeRetargeter,
    host: &mut T,
    source: T::Handle,
    target: T::Handle,
    blocks: &[BlendShapeMappingSettings],
    scale: f32,
) -> Result<usize> {
    let (Some(source_mesh), Some(target_mesh)) = (host.blend_shapes(source), host.blend_shapes(target))
    else {
        return Ok(0);
    };
    retargeter.compute(source_mesh, target_mesh, blocks)?;
    Ok(host
        .blend_shapes_mut(target)
        .map_or(0, |mesh| retargeter.apply(mesh, scale)))
}
