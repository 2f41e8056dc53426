use followme_core::TransformHierarchy;
use rustc_hash::FxHashMap;

/// Name → node table for one avatar hierarchy.
///
/// Built by a single depth-first, pre-order walk from the avatar root. When
/// several nodes share a name the first one visited wins, which matches
/// [`TransformHierarchy::find_by_name`].
#[derive(Debug, Clone)]
pub struct NameIndex<H> {
    nodes: FxHashMap<String, H>,
    duplicates: usize,
    stack: Vec<H>,
}

impl<H: Copy> NameIndex<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            duplicates: 0,
            stack: Vec::new(),
        }
    }

    pub fn build<T>(hierarchy: &T, root: H) -> Self
    where
        T: TransformHierarchy<Handle = H>,
    {
        let mut index = Self::new();
        index.rebuild(hierarchy, root);
        index
    }

    /// Clears and re-walks the hierarchy, reusing allocations.
    pub fn rebuild<T>(&mut self, hierarchy: &T, root: H)
    where
        T: TransformHierarchy<Handle = H>,
    {
        self.nodes.clear();
        self.duplicates = 0;
        self.stack.clear();
        self.stack.push(root);

        while let Some(node) = self.stack.pop() {
            if let Some(name) = hierarchy.name(node) {
                if self.nodes.contains_key(name) {
                    self.duplicates += 1;
                } else {
                    self.nodes.insert(name.to_owned(), node);
                }
            }
            self.stack
                .extend(hierarchy.children(node).iter().rev().copied());
        }

        if self.duplicates > 0 {
            log::debug!(
                "NameIndex: {} duplicate node names under root, first match wins",
                self.duplicates
            );
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<H> {
        self.nodes.get(name).copied()
    }

    /// Number of nodes whose name was shadowed by an earlier node.
    #[inline]
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<H: Copy> Default for NameIndex<H> {
    fn default() -> Self {
        Self::new()
    }
}
