#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! Foundation types for FollowMe.
//!
//! - [`errors`]: the shared error enum
//! - [`host`]: traits a host scene implements so the core can read and write it
//! - [`math`]: rotation helpers (shortest arc, mirroring, Euler conversions)
//! - [`transform`]: plain TRS and rest-pose value types

pub mod errors;
pub mod host;
pub mod math;
pub mod transform;

pub use errors::{FollowMeError, Result};
pub use host::{BlendShapeHost, BlendShapeMesh, TransformHierarchy};
pub use transform::{LocalTransform, RestPose};
