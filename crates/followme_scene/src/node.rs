use crate::transform::Transform;
use crate::{MeshKey, NodeHandle};

/// A scene node: name, hierarchy links, local transform and an optional
/// blend-shape mesh.
///
/// # Hierarchy
///
/// - `parent`: handle to the parent node (`None` for root nodes)
/// - `children`: child handles, in insertion order. Name lookups walk this
///   order depth-first, so the first inserted of two same-named siblings wins.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Blend-shape mesh owned by this node, if any.
    pub mesh: Option<MeshKey>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("")
    }

    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
