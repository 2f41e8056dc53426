//! JSON configuration for one source → target retarget pair.

use std::fs;
use std::path::Path;

use followme_core::Result;
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarSetting;
use crate::blend_shape::{BlendShapeMappingSettings, BlendShapeToBoneSettings};

fn default_blend_shape_scale() -> f32 {
    1.0
}

/// Everything the frame driver needs besides the hierarchy itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetargetConfig {
    #[serde(default)]
    pub source: AvatarSetting,
    #[serde(default)]
    pub target: AvatarSetting,
    /// Applied to every accumulated target weight.
    #[serde(default = "default_blend_shape_scale")]
    pub blend_shape_scale: f32,
    #[serde(default)]
    pub blend_shape_mappings: Vec<BlendShapeMappingSettings>,
    #[serde(default)]
    pub blend_shape_to_bones: Vec<BlendShapeToBoneSettings>,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            source: AvatarSetting::default(),
            target: AvatarSetting::default(),
            blend_shape_scale: 1.0,
            blend_shape_mappings: Vec::new(),
            blend_shape_to_bones: Vec::new(),
        }
    }
}

impl RetargetConfig {
    /// Parses a configuration and validates its mapping tables.
    ///
    /// # Errors
    ///
    /// JSON errors, or a mapping whose name and weight lists differ in length.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        for block in &config.blend_shape_mappings {
            block.validate()?;
        }
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// I/O errors, plus everything [`RetargetConfig::from_json_str`] rejects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading retarget config: {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Serialization errors from `serde_json`.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Serialization or I/O errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
