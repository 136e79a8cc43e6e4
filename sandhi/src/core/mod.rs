//! Core geometric types for the sandhi conflation library.
//!
//! - [`Point2D`]: projected map coordinate (east/north)
//! - [`Bounds`]: axis-aligned bounding envelope

mod bounds;
mod point;

pub use bounds::Bounds;
pub use point::Point2D;
