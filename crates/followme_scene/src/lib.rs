#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! Scene graph module
//!
//! A small hierarchical host for retargeting:
//! - [`Node`]: named scene node with parent/child links and a transform
//! - [`Transform`]: local position, rotation and scale
//! - [`BlendShapeSet`]: named blend-shape channels with weights
//! - [`Scene`]: node and mesh container implementing the FollowMe host traits

pub mod blend_shapes;
pub mod node;
pub mod scene;
pub mod transform;

pub use blend_shapes::BlendShapeSet;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
}
