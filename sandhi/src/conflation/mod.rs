//! Conflation Orchestrator.
//!
//! Drives a run end to end and applies the user's decisions:
//!
//! ```text
//!   selections ──► build_collections ──► MatchFinder ──► MatchRun
//!                                                         │
//!                       ┌─────────────────────────────────┤
//!                       ▼                                 ▼
//!                 CandidateList                     UnmatchedList x2
//!                       │                                 │
//!       conflate_selected / delete_selected     conflate_unmatched /
//!                       │                       remove_unmatched
//!                       ▼                                 ▼
//!                 ConflationHost (replace / copy commands, error display)
//! ```
//!
//! Every mutation returns a record that can be handed back to undo it.

mod conflator;
mod host;
mod unmatched;

pub use conflator::{
    AppliedConflation, ConflateOutcome, ConflationFailure, Conflator, CopiedFeatures, MatchRun,
    RemovedCandidates, RemovedUnmatched,
};
pub use host::{ConflationHost, ReplaceCommand, ReversibleOperation, TargetCopy};
pub use unmatched::UnmatchedList;
