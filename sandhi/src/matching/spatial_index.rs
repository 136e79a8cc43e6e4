//! Grid-based spatial index for centroid proximity queries.
//!
//! Reduces pairwise scoring from O(n×m) to O(n×k) where k is the average
//! number of subject centroids in the 3×3 cell neighbourhood of a reference.
//!
//! # Algorithm
//!
//! 1. Divide 2D space into uniform cells of size `cell_size`
//! 2. Each point is stored in the single cell containing it
//! 3. Radius queries return point indices from every cell the query circle
//!    can touch; callers still compute exact distances
//!
//! Pairs farther apart than the scorer's cutoff always score zero, so
//! pruning them through the index leaves the match result unchanged.

use std::collections::HashMap;

use crate::core::Point2D;

/// Grid cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    #[inline]
    fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// All neighboring cells (including self) within `radius` cells.
    ///
    /// Coordinates saturate at the i64 limits instead of wrapping.
    #[inline]
    fn neighbors(&self, radius: i64) -> impl Iterator<Item = CellCoord> + '_ {
        let r = radius;
        (-r..=r).flat_map(move |dx| {
            (-r..=r).map(move |dy| {
                CellCoord::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
            })
        })
    }
}

/// Uniform grid over a set of points.
#[derive(Clone, Debug)]
pub struct PointGridIndex {
    cell_size: f64,
    inv_cell_size: f64,
    grid: HashMap<CellCoord, Vec<usize>>,
    num_points: usize,
}

impl PointGridIndex {
    /// Build an index over `points`.
    ///
    /// Returns `None` if `cell_size` is not a positive finite number.
    pub fn build(points: &[Point2D], cell_size: f64) -> Option<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return None;
        }
        let inv_cell_size = 1.0 / cell_size;

        let mut grid: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            let coord = Self::cell_of(*p, inv_cell_size);
            grid.entry(coord).or_default().push(i);
        }

        Some(Self {
            cell_size,
            inv_cell_size,
            grid,
            num_points: points.len(),
        })
    }

    /// Query point indices that may be within `radius` of `point`.
    ///
    /// The buffer is cleared and filled with sorted indices.
    pub fn query_radius_into(&self, point: Point2D, radius: f64, buffer: &mut Vec<usize>) {
        buffer.clear();

        let cell = Self::cell_of(point, self.inv_cell_size);
        let cell_radius = (radius * self.inv_cell_size).ceil().max(0.0) as i64;

        for neighbor in cell.neighbors(cell_radius) {
            if let Some(indices) = self.grid.get(&neighbor) {
                buffer.extend(indices.iter().copied());
            }
        }

        // Saturated coordinates at the i64 limits can name one cell twice
        buffer.sort_unstable();
        buffer.dedup();
    }

    /// Query point indices that may be within `radius` of `point`.
    pub fn query_radius(&self, point: Point2D, radius: f64) -> Vec<usize> {
        let mut result = Vec::new();
        self.query_radius_into(point, radius, &mut result);
        result
    }

    #[inline]
    fn cell_of(point: Point2D, inv_cell_size: f64) -> CellCoord {
        CellCoord::new(
            (point.x * inv_cell_size).floor() as i64,
            (point.y * inv_cell_size).floor() as i64,
        )
    }

    /// Number of indexed points
    #[inline]
    pub fn len(&self) -> usize {
        self.num_points
    }

    /// Check if the index is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Cell size used by this index
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.grid.len()
    }
}
