//! Centroid distance scoring.

use super::{PairScore, PairScorer};
use crate::features::Feature;

/// Scores pairs by the Euclidean distance between their centroids.
///
/// ```text
/// score = max(0, 1 - d / max_distance)   if d <= threshold_distance
/// score = 0                              if d >  threshold_distance
/// ```
///
/// With `max_distance == 0` only coincident centroids score (1.0).
#[derive(Clone, Debug)]
pub struct CentroidDistanceScorer {
    max_distance: f64,
    threshold_distance: f64,
}

impl CentroidDistanceScorer {
    /// Create a scorer.
    ///
    /// # Arguments
    /// * `max_distance` - Normalization bound, usually the diagonal of the
    ///   run's combined envelope
    /// * `threshold_distance` - Hard cutoff; longer distances score zero
    pub fn new(max_distance: f64, threshold_distance: f64) -> Self {
        Self {
            max_distance: max_distance.max(0.0),
            threshold_distance,
        }
    }

    /// Normalization bound
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Hard cutoff distance
    pub fn threshold_distance(&self) -> f64 {
        self.threshold_distance
    }

    /// Centroid distance between two features
    #[inline]
    pub fn distance(&self, a: &Feature, b: &Feature) -> f64 {
        a.centroid().distance(&b.centroid())
    }

    /// Score for a raw distance.
    #[inline]
    pub fn score_distance(&self, distance: f64) -> f64 {
        if distance > self.threshold_distance {
            return 0.0;
        }
        if self.max_distance > 0.0 {
            (1.0 - distance / self.max_distance).clamp(0.0, 1.0)
        } else if distance == 0.0 {
            1.0
        } else {
            0.0
        }
    }
}

impl PairScorer for CentroidDistanceScorer {
    fn score_pair(&self, reference: &Feature, subject: &Feature) -> PairScore {
        let distance = self.distance(reference, subject);
        PairScore {
            distance,
            score: self.score_distance(distance),
            identical: false,
        }
    }

    fn cutoff_distance(&self) -> Option<f64> {
        Some(self.threshold_distance)
    }

    fn name(&self) -> &str {
        "centroid-distance"
    }
}
