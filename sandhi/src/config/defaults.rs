//! Default value functions for serde deserialization.

use crate::matching::MatchPolicy;

/// One-to-one keeps every feature in at most one candidate.
pub fn policy() -> MatchPolicy {
    MatchPolicy::OneToOne
}

pub fn threshold_distance() -> f64 {
    20.0
}

pub fn min_score() -> f64 {
    0.0
}

pub fn identity_epsilon() -> f64 {
    1e-9
}

pub fn enabled() -> bool {
    true
}

pub fn min_pairs() -> usize {
    4096
}

pub fn report_interval() -> usize {
    256
}
