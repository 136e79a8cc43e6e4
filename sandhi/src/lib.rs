//! # Sandhi: Candidate Matching for Map Conflation
//!
//! Finds correspondences between two overlapping sets of map features (a
//! *reference* set holding authoritative geometry and a *subject* set whose
//! geometry may be replaced) and manages the resulting candidate list while
//! a user reviews, conflates or discards matches.
//!
//! ## Quick Start
//!
//! ```rust
//! use sandhi::{Conflator, SandhiConfig, SimpleFeature, NoProgress};
//!
//! let reference = vec![
//!     SimpleFeature::point(1, 0.0, 0.0).into_feature().unwrap(),
//!     SimpleFeature::point(2, 100.0, 100.0).into_feature().unwrap(),
//! ];
//! let subject = vec![
//!     SimpleFeature::point(11, 1.0, 1.0).into_feature().unwrap(),
//!     SimpleFeature::point(12, 99.0, 99.0).into_feature().unwrap(),
//! ];
//!
//! let conflator = Conflator::new(SandhiConfig::default());
//! let run = conflator
//!     .generate_candidates(&reference, &subject, &NoProgress)
//!     .unwrap();
//! assert_eq!(run.candidates.len(), 2);
//! for candidate in &run.candidates {
//!     println!("{} score {:.3}", candidate.key(), candidate.score());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Point and envelope geometry
//! - [`config`]: YAML configuration
//! - [`features`]: Host feature adapter and collection builder
//! - [`scoring`]: Distance scorer, identity filter and their chain
//! - [`matching`]: Match Finder (one-to-one / disambiguating)
//! - [`candidates`]: Candidate and the selection-tracking Candidate List
//! - [`conflation`]: Orchestrator driving host replace/copy operations
//!
//! ## Data Flow
//!
//! ```text
//!   host selections
//!         │ Feature::new
//!         ▼
//!   build_collections ──► (reference, subject) over one schema
//!         │
//!         ▼
//!   MatchFinder<ScoringPipeline> ──► ScoredPair*
//!         │
//!         ▼
//!   CandidateList ◄──── listeners (UI)
//!         │
//!         ▼
//!   Conflator ──► ConflationHost (replace geometry, copy, undo)
//! ```
//!
//! All list mutation happens on one thread. Matching may run elsewhere and
//! is cancelled cooperatively through a [`ProgressSink`] such as
//! [`CancelFlag`].

pub mod candidates;
pub mod config;
pub mod conflation;
pub mod core;
pub mod error;
pub mod features;
pub mod matching;
pub mod scoring;

pub use candidates::{
    Candidate, CandidateKey, CandidateList, CandidateListListener, ChannelListener, ListEvent,
};
pub use config::{ConfigLoadError, SandhiConfig};
pub use conflation::{
    AppliedConflation, ConflateOutcome, ConflationFailure, ConflationHost, Conflator,
    CopiedFeatures, MatchRun, RemovedCandidates, RemovedUnmatched, ReplaceCommand,
    ReversibleOperation, TargetCopy, UnmatchedList,
};
pub use crate::core::{Bounds, Point2D};
pub use error::{ConflationError, ReplaceError, Result};
pub use features::{
    build_collections, Feature, FeatureCollection, FeatureId, GeometryKind, HostFeature,
    SimpleFeature,
};
pub use matching::{CancelFlag, MatchFinder, MatchPolicy, NoProgress, ProgressSink, ScoredPair};
pub use scoring::{
    CentroidDistanceScorer, IdenticalFeatureFilter, PairScore, PairScorer, ScoringPipeline,
};
