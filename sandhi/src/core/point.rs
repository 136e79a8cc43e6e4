//! Point type for projected map coordinates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point in projected map space (east, north).
///
/// Coordinates are `f64`: projected map units can be large enough that
/// `f32` loses sub-unit precision.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Component-wise minimum
    #[inline]
    pub fn min(self, other: Point2D) -> Point2D {
        Point2D::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum
    #[inline]
    pub fn max(self, other: Point2D) -> Point2D {
        Point2D::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Midpoint between this point and another
    #[inline]
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// True when both coordinates are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}
