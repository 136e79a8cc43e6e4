//! Unified configuration loading for sandhi.
//!
//! Loads all configuration from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sandhi::config::SandhiConfig;
//!
//! // Load from default path (configs/sandhi.yaml), falling back to defaults
//! let config = SandhiConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = SandhiConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`MatchingSection`] | Match policy, threshold distance, minimum score |
//! | [`IndexSection`] | Grid index use for large runs |
//! | [`ProgressSection`] | Progress reporting / cancellation granularity |
//!
//! ## Example YAML
//!
//! ```yaml
//! matching:
//!   policy: one_to_one      # or "disambiguating"
//!   threshold_distance: 20.0
//!   min_score: 0.0
//! index:
//!   enabled: true
//!   min_pairs: 4096
//! progress:
//!   report_interval: 256
//! ```

mod defaults;
mod error;
mod sandhi;
mod sections;

pub use error::ConfigLoadError;
pub use sandhi::SandhiConfig;
pub use sections::{IndexSection, MatchingSection, ProgressSection};
