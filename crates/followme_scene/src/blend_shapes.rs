use followme_core::BlendShapeMesh;
use rustc_hash::FxHashMap;

/// Named blend-shape channels and their current weights.
///
/// Channel names are unique; adding an existing name returns the index of
/// the existing channel.
#[derive(Debug, Clone, Default)]
pub struct BlendShapeSet {
    names: Vec<String>,
    weights: Vec<f32>,
    lookup: FxHashMap<String, usize>,
}

impl BlendShapeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set with all weights at `0.0`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.add_channel(name);
        }
        set
    }

    /// Appends a channel with zero weight and returns its index.
    pub fn add_channel(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(&index) = self.lookup.get(&name) {
            return index;
        }
        let index = self.names.len();
        self.lookup.insert(name.clone(), index);
        self.names.push(name);
        self.weights.push(0.0);
        index
    }

    /// Sets a weight by channel name. Returns `false` if the channel is unknown.
    pub fn set_weight_by_name(&mut self, name: &str, weight: f32) -> bool {
        match self.lookup.get(name) {
            Some(&index) => {
                self.weights[index] = weight;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn weight_by_name(&self, name: &str) -> Option<f32> {
        self.lookup.get(name).map(|&i| self.weights[i])
    }

    #[inline]
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline]
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl BlendShapeMesh for BlendShapeSet {
    fn channel_count(&self) -> usize {
        self.names.len()
    }

    fn channel_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    fn weight(&self, index: usize) -> f32 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    fn set_weight(&mut self, index: usize, weight: f32) {
        if let Some(w) = self.weights.get_mut(index) {
            *w = weight;
        }
    }
}
