//! Reversible edit commands produced by the authoring tools.
//!
//! Authoring operations apply their writes immediately, so that a later step
//! of the same operation observes the earlier ones, and return the list of
//! writes as an [`EditCommand`]. A host with its own undo stack can store the
//! command and call [`EditCommand::undo`] / [`EditCommand::redo`].

use followme_core::{LocalTransform, TransformHierarchy};

/// One recorded write to a node's local transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPatch<H> {
    pub node: H,
    pub previous: LocalTransform,
    pub new: LocalTransform,
}

/// An ordered list of transform writes under a user-facing label.
#[derive(Debug, Clone, PartialEq)]
pub struct EditCommand<H> {
    pub label: &'static str,
    pub patches: Vec<TransformPatch<H>>,
}

impl<H: Copy> EditCommand<H> {
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            patches: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Writes `new` to `node` and records the write.
    ///
    /// Returns `false` (recording nothing) if the node does not exist.
    pub fn apply<T>(&mut self, host: &mut T, node: H, new: LocalTransform) -> bool
    where
        T: TransformHierarchy<Handle = H>,
    {
        let Some(previous) = host.local_transform(node) else {
            return false;
        };
        host.set_local_transform(node, new);
        self.patches.push(TransformPatch {
            node,
            previous,
            new,
        });
        true
    }

    /// Reverts every patch, last write first.
    pub fn undo<T>(&self, host: &mut T)
    where
        T: TransformHierarchy<Handle = H>,
    {
        for patch in self.patches.iter().rev() {
            host.set_local_transform(patch.node, patch.previous);
        }
    }

    /// Re-applies every patch in recording order.
    pub fn redo<T>(&self, host: &mut T)
    where
        T: TransformHierarchy<Handle = H>,
    {
        for patch in &self.patches {
            host.set_local_transform(patch.node, patch.new);
        }
    }
}
