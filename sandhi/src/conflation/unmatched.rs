//! Features left without a candidate after a run.

use std::collections::HashSet;

use crate::features::{Feature, FeatureId};

/// Ordered set of unmatched features (reference-only or subject-only).
#[derive(Clone, Debug, Default)]
pub struct UnmatchedList {
    features: Vec<Feature>,
}

impl UnmatchedList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from features, keeping the first occurrence of each id.
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut list = Self::new();
        list.add_all(features);
        list
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in order
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Feature with `id`
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id() == id)
    }

    /// True if `id` is listed
    pub fn contains(&self, id: FeatureId) -> bool {
        self.get(id).is_some()
    }

    /// Append features not already listed. Returns how many were added.
    pub fn add_all(&mut self, features: impl IntoIterator<Item = Feature>) -> usize {
        let mut ids: HashSet<FeatureId> = self.features.iter().map(Feature::id).collect();
        let before = self.features.len();
        self.features
            .extend(features.into_iter().filter(|f| ids.insert(f.id())));
        self.features.len() - before
    }

    /// Remove features by id, returning them in list order.
    pub fn remove_all(&mut self, ids: &[FeatureId]) -> Vec<Feature> {
        let ids: HashSet<FeatureId> = ids.iter().copied().collect();
        let (removed, kept): (Vec<Feature>, Vec<Feature>) = std::mem::take(&mut self.features)
            .into_iter()
            .partition(|f| ids.contains(&f.id()));
        self.features = kept;
        removed
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.features.clear();
    }
}

impl<'a> IntoIterator for &'a UnmatchedList {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
