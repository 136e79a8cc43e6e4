//! Candidates and the stateful candidate list.
//!
//! - [`Candidate`]: one proposed reference/subject correspondence
//! - [`CandidateList`]: ordered candidates with selection tracking and
//!   change notification
//! - [`CandidateListListener`] / [`ChannelListener`]: change observers

mod candidate;
mod list;
mod listener;

pub use candidate::{Candidate, CandidateKey};
pub use list::CandidateList;
pub use listener::{CandidateListListener, ChannelListener, ListEvent};
