//! Pairwise feature scoring.
//!
//! Scores are in `[0, 1]`, higher meaning a more likely correspondence.
//!
//! - [`CentroidDistanceScorer`]: normalized centroid distance with a hard cutoff
//! - [`IdenticalFeatureFilter`]: detects coincident geometry
//! - [`ScoringPipeline`]: distance score, overridden to 1.0 for identical pairs

mod chain;
mod distance;
mod identity;

pub use chain::ScoringPipeline;
pub use distance::CentroidDistanceScorer;
pub use identity::IdenticalFeatureFilter;

use crate::features::Feature;

/// Score of one reference/subject pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairScore {
    /// Raw centroid distance
    pub distance: f64,
    /// Normalized score in [0, 1]
    pub score: f64,
    /// Geometries are coincident
    pub identical: bool,
}

/// Trait for pairwise scoring strategies.
///
/// The Match Finder only sees this trait, so match policies never duplicate
/// the scoring pipeline.
pub trait PairScorer: Send + Sync {
    /// Score a reference/subject pair.
    fn score_pair(&self, reference: &Feature, subject: &Feature) -> PairScore;

    /// Centroid distance beyond which every pair scores zero, if bounded.
    ///
    /// Lets the Match Finder skip pairs through a spatial index without
    /// changing the result.
    fn cutoff_distance(&self) -> Option<f64>;

    /// Name of this scorer for logging/debugging
    fn name(&self) -> &str;
}
