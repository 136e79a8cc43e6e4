//! Combined scoring pipeline.

use super::{CentroidDistanceScorer, IdenticalFeatureFilter, PairScore, PairScorer};
use crate::config::MatchingSection;
use crate::core::Bounds;
use crate::features::Feature;

/// Distance scoring chained with identity detection.
///
/// The distance score is computed first; identical pairs are then raised to
/// 1.0 whatever the envelope scale.
#[derive(Clone, Debug)]
pub struct ScoringPipeline {
    distance: CentroidDistanceScorer,
    identity: IdenticalFeatureFilter,
}

impl ScoringPipeline {
    /// Chain a distance scorer with an identity filter.
    pub fn new(distance: CentroidDistanceScorer, identity: IdenticalFeatureFilter) -> Self {
        Self { distance, identity }
    }

    /// Build the pipeline for one run.
    ///
    /// `max_distance` is the diagonal of `envelope`, the combined bounds of
    /// the reference and subject collections.
    pub fn for_envelope(envelope: &Bounds, config: &MatchingSection) -> Self {
        Self::new(
            CentroidDistanceScorer::new(envelope.diagonal(), config.threshold_distance),
            IdenticalFeatureFilter::new(config.identity_epsilon),
        )
    }

    /// Distance stage
    pub fn distance_scorer(&self) -> &CentroidDistanceScorer {
        &self.distance
    }

    /// Identity stage
    pub fn identity_filter(&self) -> &IdenticalFeatureFilter {
        &self.identity
    }
}

impl PairScorer for ScoringPipeline {
    fn score_pair(&self, reference: &Feature, subject: &Feature) -> PairScore {
        let mut pair = self.distance.score_pair(reference, subject);
        if self.identity.is_identical(reference, subject) {
            pair.identical = true;
            pair.score = 1.0;
        }
        pair
    }

    fn cutoff_distance(&self) -> Option<f64> {
        Some(
            self.distance
                .threshold_distance()
                .max(self.identity.epsilon()),
        )
    }

    fn name(&self) -> &str {
        "centroid-distance+identical"
    }
}
