//! render::geometry
//!
//! Mapping from lanes and rows to pixel coordinates.

use super::surface::Point;

/// Pixel geometry of the lane grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Horizontal distance between lane centers.
    pub column_width: f64,
    /// X of lane 0's center.
    pub column_offset: f64,
    /// Vertical distance between row centers.
    pub row_height: f64,
    /// Y of row 0's center.
    pub row_offset: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            column_width: 15.0,
            column_offset: 20.0,
            row_height: 20.0,
            row_offset: 10.0,
        }
    }
}

impl Geometry {
    pub fn lane_x(&self, lane: usize) -> f64 {
        lane as f64 * self.column_width + self.column_offset
    }

    pub fn row_y(&self, row: usize) -> f64 {
        row as f64 * self.row_height + self.row_offset
    }

    /// Center of the marker for a commit at `lane`, `row`.
    pub fn center(&self, lane: usize, row: usize) -> Point {
        Point::new(self.lane_x(lane), self.row_y(row))
    }

    /// Top edge of the band occupied by `row`.
    pub fn row_top(&self, row: usize) -> f64 {
        self.row_y(row) - self.row_height / 2.0
    }

    /// Canvas height needed for `rows` rows.
    pub fn canvas_height(&self, rows: usize) -> f64 {
        rows as f64 * self.row_height + self.row_offset
    }
}
