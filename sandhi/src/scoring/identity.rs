//! Identical-geometry detection.

use crate::features::Feature;

/// Detects pairs whose geometry is coincident.
///
/// Two features are identical when they share a geometry kind and their
/// centroids lie within `epsilon` of each other. Such pairs are usually the
/// same real-world object present in both datasets.
#[derive(Clone, Debug)]
pub struct IdenticalFeatureFilter {
    epsilon: f64,
}

impl IdenticalFeatureFilter {
    /// Create a filter with the given centroid tolerance.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.max(0.0),
        }
    }

    /// Centroid tolerance
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Check whether two features have coincident geometry.
    #[inline]
    pub fn is_identical(&self, a: &Feature, b: &Feature) -> bool {
        a.kind() == b.kind() && a.centroid().distance(&b.centroid()) <= self.epsilon
    }
}

impl Default for IdenticalFeatureFilter {
    fn default() -> Self {
        Self::new(1e-9)
    }
}
