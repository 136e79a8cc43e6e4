//! Integration tests for sandhi
//!
//! End-to-end runs through the public API: feature adaptation, matching,
//! candidate list selection and conflation against a scripted host.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sandhi --test integration -- --nocapture
//! RUST_LOG=debug cargo test -p sandhi --test integration
//! ```

mod common;
mod pipeline;
mod selection;
