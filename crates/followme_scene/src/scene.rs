use followme_core::{BlendShapeHost, LocalTransform, TransformHierarchy};
use glam::{Quat, Vec3};
use slotmap::SlotMap;

use crate::blend_shapes::BlendShapeSet;
use crate::node::Node;
use crate::transform::Transform;
use crate::{MeshKey, NodeHandle};

/// Scene graph.
///
/// Stores nodes and blend-shape meshes in slot maps. It is the reference
/// host used by the tests and the demo: any engine can stand in for it by
/// implementing [`TransformHierarchy`] and [`BlendShapeHost`].
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, BlendShapeSet>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Creates a named node under `parent` with the given local position.
    pub fn spawn_child(&mut self, parent: NodeHandle, name: &str, position: Vec3) -> NodeHandle {
        let mut node = Node::with_name(name);
        node.transform = Transform::from_position(position);
        let handle = self.add_node(node);
        self.attach(handle, parent);
        handle
    }

    /// Re-parents `child` under `parent`, keeping its local transform.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach");
            return;
        }

        // 1. Detach from old parent
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        // 2. Attach to new parent
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Removes a node and its whole subtree, including owned meshes.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(children) = self.nodes.get(handle).map(|n| n.children.clone()) else {
            return;
        };
        for child in children {
            self.remove_node(child);
        }

        match self.nodes.get(handle).and_then(|n| n.parent) {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(i) = p.children.iter().position(|&x| x == handle)
                {
                    p.children.remove(i);
                }
            }
            None => self.root_nodes.retain(|&x| x != handle),
        }

        if let Some(node) = self.nodes.remove(handle)
            && let Some(mesh) = node.mesh
        {
            self.meshes.remove(mesh);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    /// Convenience setter for a node's local rotation.
    pub fn set_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.rotation = rotation;
        }
    }

    // ========================================================================
    // Blend-shape meshes
    // ========================================================================

    /// Attaches a blend-shape mesh to a node, replacing any previous one.
    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: BlendShapeSet) -> Option<MeshKey> {
        let node = self.nodes.get_mut(handle)?;
        let key = self.meshes.insert(mesh);
        if let Some(old) = node.mesh.replace(key) {
            self.meshes.remove(old);
        }
        Some(key)
    }

    #[must_use]
    pub fn get_mesh(&self, handle: NodeHandle) -> Option<&BlendShapeSet> {
        let key = self.nodes.get(handle)?.mesh?;
        self.meshes.get(key)
    }

    pub fn get_mesh_mut(&mut self, handle: NodeHandle) -> Option<&mut BlendShapeSet> {
        let key = self.nodes.get(handle)?.mesh?;
        self.meshes.get_mut(key)
    }
}

impl TransformHierarchy for Scene {
    type Handle = NodeHandle;

    fn name(&self, node: NodeHandle) -> Option<&str> {
        self.get_name(node)
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(Node::parent)
    }

    fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(node).map(Node::children).unwrap_or_default()
    }

    fn local_transform(&self, node: NodeHandle) -> Option<LocalTransform> {
        self.nodes.get(node).map(|n| n.transform.into())
    }

    fn set_local_transform(&mut self, node: NodeHandle, transform: LocalTransform) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.transform = transform.into();
        }
    }
}

impl BlendShapeHost for Scene {
    type Mesh = BlendShapeSet;

    fn blend_shapes(&self, node: NodeHandle) -> Option<&BlendShapeSet> {
        self.get_mesh(node)
    }

    fn blend_shapes_mut(&mut self, node: NodeHandle) -> Option<&mut BlendShapeSet> {
        self.get_mesh_mut(node)
    }
}
