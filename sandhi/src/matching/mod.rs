//! Candidate generation: pairwise scoring and match resolution.
//!
//! The [`MatchFinder`] scores every reference/subject pair through a
//! [`PairScorer`](crate::scoring::PairScorer) and resolves the scores into
//! correspondences according to a [`MatchPolicy`].
//!
//! ```text
//!   reference (n)      subject (m)
//!        │                  │
//!        └───────┬──────────┘
//!                ▼
//!     pairwise scoring (n × m, or grid-pruned)
//!                │  progress / cancellation checks
//!                ▼
//!     ┌──────────┴───────────┐
//!     │ OneToOne             │ Disambiguating
//!     │ greedy global best   │ per-reference top match
//!     └──────────┬───────────┘
//!                ▼
//!          Vec<ScoredPair>
//! ```

mod finder;
mod policy;
mod progress;
mod spatial_index;

pub use finder::{MatchFinder, ScoredPair};
pub use policy::MatchPolicy;
pub use progress::{CancelFlag, NoProgress, ProgressSink};
pub use spatial_index::PointGridIndex;
