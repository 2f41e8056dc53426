//! Host Interfaces
//!
//! The retargeting core never owns a scene. It reads and writes the host's
//! transform hierarchy and blend-shape meshes through the traits below.
//!
//! - [`TransformHierarchy`]: named nodes, parent/child links and local TRS.
//!   World-space accessors are provided on top of the local data and may be
//!   overridden by hosts that cache world matrices.
//! - [`BlendShapeMesh`]: named, weighted deformation channels.
//! - [`BlendShapeHost`]: the blend-shape mesh attached to a node.

use std::fmt::Debug;
use std::hash::Hash;

use glam::{Affine3A, Quat, Vec3};

use crate::math;
use crate::transform::LocalTransform;

/// Read/write access to a host's transform hierarchy.
pub trait TransformHierarchy {
    /// Opaque node handle. Handles may go stale; every accessor returns
    /// `None` for nodes that no longer exist.
    type Handle: Copy + Eq + Hash + Debug;

    fn name(&self, node: Self::Handle) -> Option<&str>;

    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Children in hierarchy order. Unknown nodes have no children.
    fn children(&self, node: Self::Handle) -> &[Self::Handle];

    fn local_transform(&self, node: Self::Handle) -> Option<LocalTransform>;

    /// Overwrites the local TRS. Writes to unknown nodes are ignored.
    fn set_local_transform(&mut self, node: Self::Handle, transform: LocalTransform);

    // ========================================================================
    // Provided: world space
    // ========================================================================

    /// Local-to-world matrix, composed up the parent chain.
    fn world_matrix(&self, node: Self::Handle) -> Option<Affine3A> {
        let mut matrix = self.local_transform(node)?.to_affine();
        let mut current = self.parent(node);
        while let Some(parent) = current {
            let Some(local) = self.local_transform(parent) else {
                break;
            };
            matrix = local.to_affine() * matrix;
            current = self.parent(parent);
        }
        Some(matrix)
    }

    /// World rotation as the product of local rotations up the chain.
    /// Non-uniform scale on ancestors does not skew the result.
    fn world_rotation(&self, node: Self::Handle) -> Option<Quat> {
        let mut rotation = self.local_transform(node)?.rotation;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            let Some(local) = self.local_transform(parent) else {
                break;
            };
            rotation = local.rotation * rotation;
            current = self.parent(parent);
        }
        Some(rotation.normalize())
    }

    fn world_position(&self, node: Self::Handle) -> Option<Vec3> {
        self.world_matrix(node).map(|m| Vec3::from(m.translation))
    }

    /// Moves `node` so that its world position becomes `position`.
    fn set_world_position(&mut self, node: Self::Handle, position: Vec3) {
        let Some(mut local) = self.local_transform(node) else {
            return;
        };
        local.position = match self.parent(node).and_then(|p| self.world_matrix(p)) {
            Some(parent_world) => parent_world.inverse().transform_point3(position),
            None => position,
        };
        self.set_local_transform(node, local);
    }

    /// Rotates `node` so that its world rotation becomes `rotation`.
    fn set_world_rotation(&mut self, node: Self::Handle, rotation: Quat) {
        let Some(mut local) = self.local_transform(node) else {
            return;
        };
        local.rotation = match self.parent(node).and_then(|p| self.world_rotation(p)) {
            Some(parent_rotation) => (parent_rotation.inverse() * rotation).normalize(),
            None => rotation.normalize(),
        };
        self.set_local_transform(node, local);
    }

    // ========================================================================
    // Provided: local helpers
    // ========================================================================

    fn local_rotation(&self, node: Self::Handle) -> Option<Quat> {
        self.local_transform(node).map(|t| t.rotation)
    }

    fn set_local_rotation(&mut self, node: Self::Handle, rotation: Quat) {
        if let Some(mut local) = self.local_transform(node) {
            local.rotation = rotation;
            self.set_local_transform(node, local);
        }
    }

    fn local_euler_degrees(&self, node: Self::Handle) -> Option<Vec3> {
        self.local_transform(node).map(|t| t.euler_degrees())
    }

    fn set_local_euler_degrees(&mut self, node: Self::Handle, euler: Vec3) {
        self.set_local_rotation(node, math::euler_degrees_to_quat(euler));
    }

    // ========================================================================
    // Provided: space conversions
    // ========================================================================

    /// Transforms a point from `node`'s local space to world space.
    fn transform_point(&self, node: Self::Handle, point: Vec3) -> Option<Vec3> {
        self.world_matrix(node).map(|m| m.transform_point3(point))
    }

    /// Transforms a world-space point into `node`'s local space.
    fn inverse_transform_point(&self, node: Self::Handle, point: Vec3) -> Option<Vec3> {
        self.world_matrix(node)
            .map(|m| m.inverse().transform_point3(point))
    }

    /// Rotates a world-space direction into `node`'s local frame (scale is ignored).
    fn inverse_transform_direction(&self, node: Self::Handle, direction: Vec3) -> Option<Vec3> {
        self.world_rotation(node).map(|r| r.inverse() * direction)
    }

    // ========================================================================
    // Provided: lookup
    // ========================================================================

    /// Depth-first, pre-order search for the first node named `name` under
    /// `root` (inclusive). Duplicate names resolve to the first one visited.
    fn find_by_name(&self, root: Self::Handle, name: &str) -> Option<Self::Handle> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.name(node) == Some(name) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        None
    }

    /// Resolves a `/`-separated path of child names relative to `node`.
    /// Empty segments are ignored, so `"Body"` and `"/Body/"` are equivalent.
    fn find_path(&self, node: Self::Handle, path: &str) -> Option<Self::Handle> {
        let mut current = node;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self
                .children(current)
                .iter()
                .copied()
                .find(|&child| self.name(child) == Some(segment))?;
        }
        Some(current)
    }
}

/// A mesh exposing named blend-shape channels.
pub trait BlendShapeMesh {
    fn channel_count(&self) -> usize;

    fn channel_name(&self, index: usize) -> Option<&str>;

    /// Index of the channel called `name`, if any.
    fn index_of(&self, name: &str) -> Option<usize> {
        (0..self.channel_count()).find(|&i| self.channel_name(i) == Some(name))
    }

    /// Current weight of a channel. Out-of-range indices read as `0.0`.
    fn weight(&self, index: usize) -> f32;

    /// Writes a channel weight. Out-of-range indices are ignored.
    fn set_weight(&mut self, index: usize, weight: f32);
}

/// Access to the blend-shape mesh owned by a node (body or part object).
pub trait BlendShapeHost: TransformHierarchy {
    type Mesh: BlendShapeMesh;

    fn blend_shapes(&self, node: Self::Handle) -> Option<&Self::Mesh>;

    fn blend_shapes_mut(&mut self, node: Self::Handle) -> Option<&mut Self::Mesh>;
}
