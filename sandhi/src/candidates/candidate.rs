//! Candidate correspondence between a reference and a subject feature.

use std::collections::BTreeSet;
use std::fmt;

use crate::features::{Feature, FeatureId};
use crate::matching::ScoredPair;

/// Identity of a candidate: its reference and subject feature ids.
///
/// Candidates are compared by key only, never by score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateKey {
    /// Reference feature id
    pub reference: FeatureId,
    /// Subject feature id
    pub subject: FeatureId,
}

impl CandidateKey {
    /// Create a key
    pub fn new(reference: FeatureId, subject: FeatureId) -> Self {
        Self { reference, subject }
    }
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.reference, self.subject)
    }
}

/// A proposed correspondence. Immutable once created.
#[derive(Clone, Debug)]
pub struct Candidate {
    reference: Feature,
    subject: Feature,
    distance: f64,
    score: f64,
    identical: bool,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(reference: Feature, subject: Feature, distance: f64, score: f64) -> Self {
        Self {
            reference,
            subject,
            distance,
            score,
            identical: false,
        }
    }

    /// Identity key
    #[inline]
    pub fn key(&self) -> CandidateKey {
        CandidateKey::new(self.reference.id(), self.subject.id())
    }

    /// Reference feature
    #[inline]
    pub fn reference(&self) -> &Feature {
        &self.reference
    }

    /// Subject feature
    #[inline]
    pub fn subject(&self) -> &Feature {
        &self.subject
    }

    /// Centroid distance
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Score in [0, 1]
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Geometries were coincident when scored
    #[inline]
    pub fn is_identical(&self) -> bool {
        self.identical
    }

    /// True if either side is the feature `id`
    #[inline]
    pub fn involves(&self, id: FeatureId) -> bool {
        self.reference.id() == id || self.subject.id() == id
    }

    /// Tag keys set on both features with different values.
    pub fn conflicting_tag_keys(&self) -> BTreeSet<&str> {
        let subject_tags = self.subject.tags();
        self.reference
            .tags()
            .iter()
            .filter(|(k, v)| subject_tags.get(*k).is_some_and(|sv| sv != *v))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Whether merging the pair would need a tag decision
    pub fn has_tag_conflicts(&self) -> bool {
        !self.conflicting_tag_keys().is_empty()
    }
}

impl From<ScoredPair> for Candidate {
    fn from(pair: ScoredPair) -> Self {
        Self {
            reference: pair.reference,
            subject: pair.subject,
            distance: pair.distance,
            score: pair.score,
            identical: pair.identical,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Candidate {}
