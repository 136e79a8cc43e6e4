//! Match resolution policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How scored pairs are resolved into candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Each reference and each subject is used at most once; the globally
    /// best remaining pair is taken first.
    #[default]
    OneToOne,
    /// Every reference gets its own top subject; a subject may be the top
    /// match of several references.
    Disambiguating,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::OneToOne => write!(f, "one-to-one"),
            MatchPolicy::Disambiguating => write!(f, "disambiguating"),
        }
    }
}
