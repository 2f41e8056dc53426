//! Blend-shape retargeting.
//!
//! Source channel weights are redistributed onto differently named target
//! channels through [`BlendShapeMappingSettings`] blocks. Contributions to
//! the same target channel are summed, then scaled once by the global blend
//! shape scale. Target weights can in turn drive bone rotations through
//! [`BlendShapeToBoneSettings`].

use followme_core::{BlendShapeHost, BlendShapeMesh, FollowMeError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// One source channel feeding N target channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeMappingSetting {
    pub source_blend_shape_name: String,
    #[serde(default)]
    pub target_blend_shape_names: Vec<String>,
    /// Index-aligned with `target_blend_shape_names`.
    #[serde(default)]
    pub target_blend_shape_weights: Vec<f32>,
}

impl BlendShapeMappingSetting {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            source_blend_shape_name: source.to_string(),
            ..Self::default()
        }
    }

    /// Appends one `(target, weight)` pair.
    #[must_use]
    pub fn with_target(mut self, target: &str, weight: f32) -> Self {
        self.target_blend_shape_names.push(target.to_string());
        self.target_blend_shape_weights.push(weight);
        self
    }

    /// Weight toward `target`, if this mapping lists it.
    #[must_use]
    pub fn weight_for(&self, target: &str) -> Option<f32> {
        self.target_blend_shape_names
            .iter()
            .zip(&self.target_blend_shape_weights)
            .find_map(|(name, &weight)| (name == target).then_some(weight))
    }

    fn validate(&self) -> Result<()> {
        let names = self.target_blend_shape_names.len();
        let weights = self.target_blend_shape_weights.len();
        if names == weights {
            Ok(())
        } else {
            Err(FollowMeError::MismatchedMappingLengths {
                source_name: self.source_blend_shape_name.clone(),
                names,
                weights,
            })
        }
    }
}

fn default_scale_weight() -> f32 {
    1.0
}

/// A mapping table plus the channel name lists it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeMappingSettings {
    #[serde(default)]
    pub name: String,
    /// Multiplier applied to every source weight read through this block.
    #[serde(default = "default_scale_weight")]
    pub scale_weight: f32,
    #[serde(default)]
    pub source_names: Vec<String>,
    #[serde(default)]
    pub target_names: Vec<String>,
    #[serde(default)]
    pub mappings: Vec<BlendShapeMappingSetting>,
}

impl Default for BlendShapeMappingSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            scale_weight: 1.0,
            source_names: Vec::new(),
            target_names: Vec::new(),
            mappings: Vec::new(),
        }
    }
}

impl BlendShapeMappingSettings {
    /// Checks every mapping for matching name and weight counts.
    ///
    /// # Errors
    ///
    /// [`FollowMeError::MismatchedMappingLengths`] for the first bad mapping.
    pub fn validate(&self) -> Result<()> {
        self.mappings
            .iter()
            .try_for_each(BlendShapeMappingSetting::validate)
    }
}

/// Euler component (and sign) a blend-shape weight rotates a bone around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EulerAxis {
    #[default]
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl EulerAxis {
    /// Signed unit offset in Euler space.
    #[must_use]
    pub fn offset(self) -> Vec3 {
        match self {
            EulerAxis::X => Vec3::X,
            EulerAxis::Y => Vec3::Y,
            EulerAxis::Z => Vec3::Z,
            EulerAxis::NegX => Vec3::NEG_X,
            EulerAxis::NegY => Vec3::NEG_Y,
            EulerAxis::NegZ => Vec3::NEG_Z,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeToBoneSetting {
    pub blend_shape_name: String,
    /// Degrees per unit of weight.
    #[serde(default)]
    pub sensitivity: f32,
    #[serde(default)]
    pub axis: EulerAxis,
}

/// Drives one bone's local Euler rotation from target blend-shape weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeToBoneSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub bone_name: String,
    /// Local Euler angles (degrees) the offsets are added to.
    #[serde(default)]
    pub rest_euler: Vec3,
    #[serde(default)]
    pub settings: Vec<BlendShapeToBoneSetting>,
}

impl BlendShapeToBoneSettings {
    /// Rest Euler plus every setting's signed, weighted offset.
    #[must_use]
    pub fn euler_for<M: BlendShapeMesh + ?Sized>(&self, mesh: &M) -> Vec3 {
        self.settings.iter().fold(self.rest_euler, |euler, setting| {
            let weight = weight_by_name(mesh, &setting.blend_shape_name);
            euler + setting.axis.offset() * (weight * setting.sensitivity)
        })
    }
}

// ============================================================================
// Mesh helpers
// ============================================================================

/// Every channel name of `mesh`, in channel order.
#[must_use]
pub fn blend_shape_names<M: BlendShapeMesh + ?Sized>(mesh: &M) -> Vec<String> {
    (0..mesh.channel_count())
        .filter_map(|i| mesh.channel_name(i).map(str::to_owned))
        .collect()
}

/// Current weight of the channel called `name`, or `0.0` if there is none.
#[must_use]
pub fn weight_by_name<M: BlendShapeMesh + ?Sized>(mesh: &M, name: &str) -> f32 {
    mesh.index_of(name).map_or(0.0, |i| mesh.weight(i))
}

// ============================================================================
// Weight retargeting
// ============================================================================

/// Accumulates mapped weights per target channel and writes them out.
///
/// [`compute`](Self::compute) only reads both meshes and
/// [`apply`](Self::apply) only writes the target, so a host that owns both
/// meshes can borrow them one at a time.
#[derive(Debug, Clone, Default)]
pub struct BlendShapeRetargeter {
    // Dense per-target-channel sums; `None` marks untouched channels.
    sums: Vec<Option<f32>>,
}

impl BlendShapeRetargeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums `target_weight * source_weight * scale_weight` per target channel.
    ///
    /// # Errors
    ///
    /// Returns the first [`FollowMeError::MismatchedMappingLengths`] found in
    /// any block. Validation runs before accumulation, so on error nothing
    /// has been summed.
    pub fn compute<S, D>(
        &mut self,
        source: &S,
        target: &D,
        blocks: &[BlendShapeMappingSettings],
    ) -> Result<()>
    where
        S: BlendShapeMesh + ?Sized,
        D: BlendShapeMesh + ?Sized,
    {
        self.sums.clear();
        for block in blocks {
            block.validate()?;
        }
        self.sums.resize(target.channel_count(), None);

        for block in blocks {
            for mapping in &block.mappings {
                let Some(source_index) = source.index_of(&mapping.source_blend_shape_name) else {
                    continue;
                };
                let source_weight = source.weight(source_index) * block.scale_weight;

                for (name, &weight) in mapping
                    .target_blend_shape_names
                    .iter()
                    .zip(&mapping.target_blend_shape_weights)
                {
                    let Some(sum) = target
                        .index_of(name)
                        .and_then(|i| self.sums.get_mut(i))
                    else {
                        continue;
                    };
                    *sum.get_or_insert(0.0) += weight * source_weight;
                }
            }
        }
        Ok(())
    }

    /// Writes every accumulated sum times `global_scale`. Returns the number
    /// of channels written; untouched channels keep their value.
    pub fn apply<D: BlendShapeMesh + ?Sized>(&self, target: &mut D, global_scale: f32) -> usize {
        let mut written = 0;
        for (index, sum) in self.sums.iter().enumerate() {
            if let Some(sum) = sum {
                target.set_weight(index, sum * global_scale);
                written += 1;
            }
        }
        written
    }

    /// Accumulated weight for a target channel, before the global scale.
    #[must_use]
    pub fn accumulated(&self, index: usize) -> Option<f32> {
        self.sums.get(index).copied().flatten()
    }

    /// [`compute`](Self::compute) followed by [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// See [`compute`](Self::compute). The target is untouched on error.
    pub fn update_weights<S, D>(
        &mut self,
        source: &S,
        target: &mut D,
        blocks: &[BlendShapeMappingSettings],
        global_scale: f32,
    ) -> Result<usize>
    where
        S: BlendShapeMesh + ?Sized,
        D: BlendShapeMesh + ?Sized,
    {
        self.compute(source, target, blocks)?;
        Ok(self.apply(target, global_scale))
    }
}

/// One-shot weight retargeting between two meshes.
///
/// # Errors
///
/// See [`BlendShapeRetargeter::compute`].
pub fn update_weights<S, D>(
    source: &S,
    target: &mut D,
    blocks: &[BlendShapeMappingSettings],
    global_scale: f32,
) -> Result<usize>
where
    S: BlendShapeMesh + ?Sized,
    D: BlendShapeMesh + ?Sized,
{
    BlendShapeRetargeter::new().update_weights(source, target, blocks, global_scale)
}

// ============================================================================
// Weight -> bone
// ============================================================================

/// Sets bone rotations from the weights of the mesh on `mesh_node`.
///
/// Bones are looked up by name under `avatar_root`. Disabled blocks and
/// blocks whose bone is not found are skipped. Each bone's local Euler
/// rotation is overwritten, so repeated calls with the same weights give the
/// same pose. Returns the number of bones written.
pub fn update_bone_from_weights<H: BlendShapeHost>(
    host: &mut H,
    avatar_root: H::Handle,
    mesh_node: H::Handle,
    blocks: &[BlendShapeToBoneSettings],
) -> usize {
    let mut written = 0;
    for block in blocks.iter().filter(|b| b.enabled) {
        let Some(bone) = host.find_by_name(avatar_root, &block.bone_name) else {
            log::debug!("Blend shape to bone: '{}' not found", block.bone_name);
            continue;
        };
        let Some(mesh) = host.blend_shapes(mesh_node) else {
            return written;
        };
        let euler = block.euler_for(mesh);
        host.set_local_euler_degrees(bone, euler);
        written += 1;
    }
    written
}
