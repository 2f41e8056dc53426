//! Error Types
//!
//! This module defines the error type shared by every FollowMe crate.
//!
//! # Overview
//!
//! [`FollowMeError`] only covers *malformed configuration* and I/O. Missing
//! bones, channels or meshes are never errors: retargeting skips them and
//! carries on with the rest of the rig.
//!
//! # Usage
//!
//! ```rust,ignore
//! use followme_core::errors::{FollowMeError, Result};
//!
//! fn check(names: usize, weights: usize) -> Result<()> {
//!     if names != weights {
//!         return Err(FollowMeError::MismatchedMappingLengths {
//!             source_name: "Smile".into(),
//!             names,
//!             weights,
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for FollowMe.
#[derive(Error, Debug)]
pub enum FollowMeError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The avatar description contains no human bones.
    #[error("Avatar description has no human bones")]
    EmptyAvatarDescription,

    /// Source and target snapshots were built from different bone tables.
    #[error("Skeleton snapshots are not index-aligned (source: {source_len} bones, target: {target_len} bones)")]
    RegistryMismatch {
        /// Bone count of the source snapshot
        source_len: usize,
        /// Bone count of the target snapshot
        target_len: usize,
    },

    /// A blend-shape mapping has different numbers of target names and weights.
    #[error("Blend shape mapping '{source_name}' has {names} target names but {weights} weights")]
    MismatchedMappingLengths {
        /// Source channel of the broken mapping
        source_name: String,
        /// Number of target names
        names: usize,
        /// Number of target weights
        weights: usize,
    },

    /// A node required by an authoring operation could not be found.
    #[error("Node not found: {0}")]
    MissingNode(String),

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, FollowMeError>`.
pub type Result<T> = std::result::Result<T, FollowMeError>;
