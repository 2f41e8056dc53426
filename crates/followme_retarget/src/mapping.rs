//! Mapping table authoring.
//!
//! The `mappings` of a [`BlendShapeMappingSettings`] block are regenerated
//! from its `source_names` and `target_names` rather than edited by hand:
//! one entry per source name, each listing every target name once.
//!
//! All three generators leave the block untouched when either name list is
//! empty.

use followme_core::BlendShapeMesh;
use rustc_hash::FxHashMap;

use crate::blend_shape::{BlendShapeMappingSetting, BlendShapeMappingSettings, blend_shape_names};

impl BlendShapeMappingSettings {
    /// Replaces `source_names` with the channel names of `mesh`.
    pub fn set_source_names<M: BlendShapeMesh + ?Sized>(&mut self, mesh: &M) {
        self.source_names = blend_shape_names(mesh);
    }

    /// Replaces `target_names` with the channel names of `mesh`.
    pub fn set_target_names<M: BlendShapeMesh + ?Sized>(&mut self, mesh: &M) {
        self.target_names = blend_shape_names(mesh);
    }

    fn has_names(&self) -> bool {
        !self.source_names.is_empty() && !self.target_names.is_empty()
    }

    /// `(source, target) -> weight` of the current table. First entry wins.
    fn previous_weights(&self) -> FxHashMap<(String, String), f32> {
        let mut weights = FxHashMap::default();
        for mapping in &self.mappings {
            for (target, &weight) in mapping
                .target_blend_shape_names
                .iter()
                .zip(&mapping.target_blend_shape_weights)
            {
                weights
                    .entry((mapping.source_blend_shape_name.clone(), target.clone()))
                    .or_insert(weight);
            }
        }
        weights
    }

    fn generate(&mut self, mut weight: impl FnMut(&str, &str) -> f32) {
        self.mappings = self
            .source_names
            .iter()
            .map(|source| {
                self.target_names
                    .iter()
                    .fold(BlendShapeMappingSetting::new(source), |m, target| {
                        let w = weight(source, target);
                        m.with_target(target, w)
                    })
            })
            .collect();
    }
}

/// Rebuilds the table with every weight at zero, except pairs that already
/// had a weight in the previous table.
pub fn build_mapping(settings: &mut BlendShapeMappingSettings) {
    if !settings.has_names() {
        return;
    }
    let previous = settings.previous_weights();
    settings.generate(|source, target| {
        previous
            .get(&(source.to_owned(), target.to_owned()))
            .copied()
            .unwrap_or(0.0)
    });
    log::debug!(
        "Built blend shape mapping: {} x {}",
        settings.source_names.len(),
        settings.target_names.len()
    );
}

/// Rebuilds the table with weight `1.0` where one name contains the other,
/// `0.0` elsewhere. Previous weights are discarded.
pub fn auto_mapping(settings: &mut BlendShapeMappingSettings) {
    if !settings.has_names() {
        return;
    }
    settings.generate(|source, target| {
        if source.contains(target) || target.contains(source) {
            1.0
        } else {
            0.0
        }
    });
}

/// Swaps the source and target roles. Each new `(source, target)` weight is
/// the previous table's `(target, source)` weight, or zero.
pub fn inverse_mapping(settings: &mut BlendShapeMappingSettings) {
    if !settings.has_names() {
        return;
    }
    let previous = settings.previous_weights();
    std::mem::swap(&mut settings.source_names, &mut settings.target_names);
    settings.generate(|source, target| {
        previous
            .get(&(target.to_owned(), source.to_owned()))
            .copied()
            .unwrap_or(0.0)
    });
}
