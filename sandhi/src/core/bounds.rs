//! Axis-aligned bounding envelope.
//!
//! [`Bounds`] is used for:
//! - Feature extents (a feature's centroid is the center of its bounds)
//! - The combined envelope of a matching run, whose diagonal normalizes
//!   centroid distances into scores
//!
//! # Usage
//!
//! ```rust
//! use sandhi::core::{Bounds, Point2D};
//!
//! let mut envelope = Bounds::empty();
//! envelope.expand_to_include(Point2D::new(0.0, 0.0));
//! envelope.expand_to_include(Point2D::new(30.0, 40.0));
//!
//! assert_eq!(envelope.diagonal(), 50.0);
//! assert_eq!(envelope.center(), Point2D::new(15.0, 20.0));
//! ```

use serde::{Deserialize, Serialize};

use super::point::Point2D;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (smallest x and y values).
    pub min: Point2D,
    /// Maximum corner (largest x and y values).
    pub max: Point2D,
}

impl Bounds {
    /// Create a new bounding box from min and max corners.
    #[inline]
    pub const fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Create an empty (invalid) bounding box.
    ///
    /// The empty bounds has min > max, so it will expand to fit any point.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create bounds from a single point.
    #[inline]
    pub fn from_point(point: Point2D) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest bounds containing every point of the iterator.
    pub fn from_points<I: IntoIterator<Item = Point2D>>(points: I) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand_to_include(p);
        }
        bounds
    }

    /// Check if the bounds are empty (invalid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Width of the bounding box (x extent).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the bounding box (y extent).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Length of the min-max diagonal. Zero for empty bounds.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.min.distance(&self.max)
    }

    /// Center of the bounding box.
    #[inline]
    pub fn center(&self) -> Point2D {
        self.min.midpoint(&self.max)
    }

    /// Check if a point is inside the bounding box.
    #[inline]
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this bounds intersects with another.
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Compute the union of two bounds (smallest box containing both).
    #[inline]
    pub fn union(&self, other: &Bounds) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Expand bounds to include a point.
    #[inline]
    pub fn expand_to_include(&mut self, point: Point2D) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Expand bounds to include another bounds.
    #[inline]
    pub fn expand_to_include_bounds(&mut self, other: &Bounds) {
        *self = self.union(other);
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}
