//! Humanoid bone set and the registry that drives retargeting order.
//!
//! The registry is a fixed, ordered table. Every [`SkeletonSnapshot`] is built
//! by walking it once, so two snapshots built from the same registry are
//! index-aligned: `source.bones()[i].bone == target.bones()[i].bone`.
//!
//! [`SkeletonSnapshot`]: crate::snapshot::SkeletonSnapshot

/// Humanoid joint identifier. Shared by every rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoneId {
    Hips,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftToes,
    RightToes,
    LeftEye,
    RightEye,
    Jaw,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
    UpperChest,
}

/// One row of the bone registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneDescriptor {
    pub bone: BoneId,
    /// Canonical human name, joined against `AvatarHumanBone::human_name`.
    pub name: &'static str,
    /// Disabled bones are skipped entirely and take no snapshot slot.
    pub enabled: bool,
}

impl BoneDescriptor {
    #[must_use]
    pub const fn new(bone: BoneId, name: &'static str, enabled: bool) -> Self {
        Self {
            bone,
            name,
            enabled,
        }
    }
}

const HUMANOID_BONES: &[BoneDescriptor] = &[
    BoneDescriptor::new(BoneId::Hips, "Hips", true),
    BoneDescriptor::new(BoneId::LeftUpperLeg, "LeftUpperLeg", true),
    BoneDescriptor::new(BoneId::RightUpperLeg, "RightUpperLeg", true),
    BoneDescriptor::new(BoneId::LeftLowerLeg, "LeftLowerLeg", true),
    BoneDescriptor::new(BoneId::RightLowerLeg, "RightLowerLeg", true),
    BoneDescriptor::new(BoneId::LeftFoot, "LeftFoot", true),
    BoneDescriptor::new(BoneId::RightFoot, "RightFoot", true),
    BoneDescriptor::new(BoneId::Spine, "Spine", true),
    BoneDescriptor::new(BoneId::Chest, "Chest", true),
    BoneDescriptor::new(BoneId::Neck, "Neck", true),
    BoneDescriptor::new(BoneId::Head, "Head", true),
    BoneDescriptor::new(BoneId::LeftShoulder, "LeftShoulder", true),
    BoneDescriptor::new(BoneId::RightShoulder, "RightShoulder", true),
    BoneDescriptor::new(BoneId::LeftUpperArm, "LeftUpperArm", true),
    BoneDescriptor::new(BoneId::RightUpperArm, "RightUpperArm", true),
    BoneDescriptor::new(BoneId::LeftLowerArm, "LeftLowerArm", true),
    BoneDescriptor::new(BoneId::RightLowerArm, "RightLowerArm", true),
    BoneDescriptor::new(BoneId::LeftHand, "LeftHand", true),
    BoneDescriptor::new(BoneId::RightHand, "RightHand", true),
    BoneDescriptor::new(BoneId::LeftToes, "LeftToes", true),
    BoneDescriptor::new(BoneId::RightToes, "RightToes", true),
    // Eyes and jaw are driven by blend-shape-to-bone settings instead.
    BoneDescriptor::new(BoneId::LeftEye, "LeftEye", false),
    BoneDescriptor::new(BoneId::RightEye, "RightEye", false),
    BoneDescriptor::new(BoneId::Jaw, "Jaw", false),
    BoneDescriptor::new(BoneId::LeftThumbProximal, "Left Thumb Proximal", true),
    BoneDescriptor::new(BoneId::LeftThumbIntermediate, "Left Thumb Intermediate", true),
    BoneDescriptor::new(BoneId::LeftThumbDistal, "Left Thumb Distal", true),
    BoneDescriptor::new(BoneId::LeftIndexProximal, "Left Index Proximal", true),
    BoneDescriptor::new(BoneId::LeftIndexIntermediate, "Left Index Intermediate", true),
    BoneDescriptor::new(BoneId::LeftIndexDistal, "Left Index Distal", true),
    BoneDescriptor::new(BoneId::LeftMiddleProximal, "Left Middle Proximal", true),
    BoneDescriptor::new(BoneId::LeftMiddleIntermediate, "Left Middle Intermediate", true),
    BoneDescriptor::new(BoneId::LeftMiddleDistal, "Left Middle Distal", true),
    BoneDescriptor::new(BoneId::LeftRingProximal, "Left Ring Proximal", true),
    BoneDescriptor::new(BoneId::LeftRingIntermediate, "Left Ring Intermediate", true),
    BoneDescriptor::new(BoneId::LeftRingDistal, "Left Ring Distal", true),
    BoneDescriptor::new(BoneId::LeftLittleProximal, "Left Little Proximal", true),
    BoneDescriptor::new(BoneId::LeftLittleIntermediate, "Left Little Intermediate", true),
    BoneDescriptor::new(BoneId::LeftLittleDistal, "Left Little Distal", true),
    BoneDescriptor::new(BoneId::RightThumbProximal, "Right Thumb Proximal", true),
    BoneDescriptor::new(BoneId::RightThumbIntermediate, "Right Thumb Intermediate", true),
    BoneDescriptor::new(BoneId::RightThumbDistal, "Right Thumb Distal", true),
    BoneDescriptor::new(BoneId::RightIndexProximal, "Right Index Proximal", true),
    BoneDescriptor::new(BoneId::RightIndexIntermediate, "Right Index Intermediate", true),
    BoneDescriptor::new(BoneId::RightIndexDistal, "Right Index Distal", true),
    BoneDescriptor::new(BoneId::RightMiddleProximal, "Right Middle Proximal", true),
    BoneDescriptor::new(BoneId::RightMiddleIntermediate, "Right Middle Intermediate", true),
    BoneDescriptor::new(BoneId::RightMiddleDistal, "Right Middle Distal", true),
    BoneDescriptor::new(BoneId::RightRingProximal, "Right Ring Proximal", true),
    BoneDescriptor::new(BoneId::RightRingIntermediate, "Right Ring Intermediate", true),
    BoneDescriptor::new(BoneId::RightRingDistal, "Right Ring Distal", true),
    BoneDescriptor::new(BoneId::RightLittleProximal, "Right Little Proximal", true),
    BoneDescriptor::new(BoneId::RightLittleIntermediate, "Right Little Intermediate", true),
    BoneDescriptor::new(BoneId::RightLittleDistal, "Right Little Distal", true),
    BoneDescriptor::new(BoneId::UpperChest, "UpperChest", true),
];

/// Ordered, immutable bone table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneRegistry {
    entries: &'static [BoneDescriptor],
}

impl BoneRegistry {
    /// The standard humanoid table.
    #[must_use]
    pub const fn humanoid() -> Self {
        Self {
            entries: HUMANOID_BONES,
        }
    }

    /// A registry over a caller-provided static table.
    #[must_use]
    pub const fn from_static(entries: &'static [BoneDescriptor]) -> Self {
        Self { entries }
    }

    /// All rows, including disabled ones, in table order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &'static [BoneDescriptor] {
        self.entries
    }

    /// Enabled rows in table order. This order defines snapshot indices.
    pub fn enabled(&self) -> impl Iterator<Item = &'static BoneDescriptor> + use<> {
        self.entries.iter().filter(|e| e.enabled)
    }

    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    #[must_use]
    pub fn descriptor(&self, bone: BoneId) -> Option<&'static BoneDescriptor> {
        self.entries.iter().find(|e| e.bone == bone)
    }
}

impl Default for BoneRegistry {
    fn default() -> Self {
        Self::humanoid()
    }
}

/// Bilateral pairs, written `(left, right)`, that the mirror tool copies across.
pub const MIRROR_PAIRS: &[(BoneId, BoneId)] = &[
    (BoneId::LeftUpperLeg, BoneId::RightUpperLeg),
    (BoneId::LeftLowerLeg, BoneId::RightLowerLeg),
    (BoneId::LeftFoot, BoneId::RightFoot),
    (BoneId::LeftShoulder, BoneId::RightShoulder),
    (BoneId::LeftUpperArm, BoneId::RightUpperArm),
    (BoneId::LeftLowerArm, BoneId::RightLowerArm),
    (BoneId::LeftHand, BoneId::RightHand),
    (BoneId::LeftToes, BoneId::RightToes),
    (BoneId::LeftEye, BoneId::RightEye),
    (BoneId::LeftThumbProximal, BoneId::RightThumbProximal),
    (BoneId::LeftThumbIntermediate, BoneId::RightThumbIntermediate),
    (BoneId::LeftThumbDistal, BoneId::RightThumbDistal),
    (BoneId::LeftIndexProximal, BoneId::RightIndexProximal),
    (BoneId::LeftIndexIntermediate, BoneId::RightIndexIntermediate),
    (BoneId::LeftIndexDistal, BoneId::RightIndexDistal),
    (BoneId::LeftMiddleProximal, BoneId::RightMiddleProximal),
    (BoneId::LeftMiddleIntermediate, BoneId::RightMiddleIntermediate),
    (BoneId::LeftMiddleDistal, BoneId::RightMiddleDistal),
    (BoneId::LeftRingProximal, BoneId::RightRingProximal),
    (BoneId::LeftRingIntermediate, BoneId::RightRingIntermediate),
    (BoneId::LeftRingDistal, BoneId::RightRingDistal),
    (BoneId::LeftLittleProximal, BoneId::RightLittleProximal),
    (BoneId::LeftLittleIntermediate, BoneId::RightLittleIntermediate),
    (BoneId::LeftLittleDistal, BoneId::RightLittleDistal),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanoid_registry_starts_at_hips() {
        let registry = BoneRegistry::humanoid();
        assert_eq!(registry.enabled().next().map(|e| e.bone), Some(BoneId::Hips));
    }

    #[test]
    fn disabled_bones_are_not_enumerated() {
        let registry = BoneRegistry::humanoid();
        assert!(registry.enabled().all(|e| e.bone != BoneId::Jaw));
        assert_eq!(registry.descriptor(BoneId::Jaw).map(|d| d.enabled), Some(false));
        assert_eq!(registry.descriptor(BoneId::Hips).map(|d| d.name), Some("Hips"));
        assert_eq!(registry.enabled_count(), registry.entries().len() - 3);
    }

    #[test]
    fn enumeration_is_stable() {
        let registry = BoneRegistry::humanoid();
        let a: Vec<_> = registry.enabled().map(|e| e.bone).collect();
        let b: Vec<_> = registry.enabled().map(|e| e.bone).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_names_are_unique() {
        let entries = BoneRegistry::humanoid().entries();
        for (i, a) in entries.iter().enumerate() {
            assert!(entries[i + 1..].iter().all(|b| b.name != a.name), "{}", a.name);
        }
    }
}
