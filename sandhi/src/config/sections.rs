//! Configuration sections.

use serde::{Deserialize, Serialize};

use super::defaults;
use super::error::ConfigLoadError;
use crate::matching::MatchPolicy;

/// Candidate generation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchingSection {
    /// How scored pairs are resolved into candidates
    #[serde(default = "defaults::policy")]
    pub policy: MatchPolicy,

    /// Centroid distances above this score zero, whatever the envelope size.
    /// Default: 20.0 map units
    #[serde(default = "defaults::threshold_distance")]
    pub threshold_distance: f64,

    /// Pairs must score strictly above this to become candidates.
    /// Default: 0.0
    #[serde(default = "defaults::min_score")]
    pub min_score: f64,

    /// Centroids closer than this are treated as coincident.
    #[serde(default = "defaults::identity_epsilon")]
    pub identity_epsilon: f64,
}

impl Default for MatchingSection {
    fn default() -> Self {
        Self {
            policy: defaults::policy(),
            threshold_distance: defaults::threshold_distance(),
            min_score: defaults::min_score(),
            identity_epsilon: defaults::identity_epsilon(),
        }
    }
}

impl MatchingSection {
    /// Builder-style setter for the match policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder-style setter for the threshold distance.
    pub fn with_threshold_distance(mut self, distance: f64) -> Self {
        self.threshold_distance = distance;
        self
    }

    /// Builder-style setter for the minimum score.
    pub fn with_min_score(mut self, score: f64) -> Self {
        self.min_score = score;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(self.threshold_distance >= 0.0) {
            return Err(ConfigLoadError::Invalid(format!(
                "matching.threshold_distance must be >= 0, got {}",
                self.threshold_distance
            )));
        }
        if !(0.0..1.0).contains(&self.min_score) {
            return Err(ConfigLoadError::Invalid(format!(
                "matching.min_score must be in [0, 1), got {}",
                self.min_score
            )));
        }
        if !(self.identity_epsilon >= 0.0) {
            return Err(ConfigLoadError::Invalid(format!(
                "matching.identity_epsilon must be >= 0, got {}",
                self.identity_epsilon
            )));
        }
        Ok(())
    }
}

/// Spatial index settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexSection {
    /// Allow the grid index when the run is large enough
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Reference × subject pair count at which the index is used.
    /// Below this, brute-force scoring is faster.
    #[serde(default = "defaults::min_pairs")]
    pub min_pairs: usize,
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            min_pairs: defaults::min_pairs(),
        }
    }
}

/// Progress reporting settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressSection {
    /// Pairs scored between progress reports and cancellation checks
    #[serde(default = "defaults::report_interval")]
    pub report_interval: usize,
}

impl Default for ProgressSection {
    fn default() -> Self {
        Self {
            report_interval: defaults::report_interval(),
        }
    }
}

impl ProgressSection {
    pub(crate) fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.report_interval == 0 {
            return Err(ConfigLoadError::Invalid(
                "progress.report_interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
