//! Coordinate spaces and the logical-to-cell scaler.
//!
//! Objects are positioned in a logical grid. Each logical unit is stretched by `spacing + 1`
//! physical cells along its axis, which lets a host give characters extra room (a common trick to
//! make a monospace grid look closer to square).

use euclid::{Point2D, Size2D, Vector2D};
use serde::Deserialize;

/// Used to group units positioned by drawable objects.
pub struct LogicalSpace;

/// Used to group units that address cells of a composited frame.
pub struct CellSpace;

/// Position of an object in the logical grid. May be negative or past the edges of the grid.
pub type LogicalPoint = Point2D<i32, LogicalSpace>;

/// Signed extent of a shape in the logical grid.
pub type LogicalExtent = Vector2D<i32, LogicalSpace>;

/// Size of the logical grid.
pub type LogicalSize = Size2D<u32, LogicalSpace>;

/// The XY coordinates of a cell in a frame, starting from (0, 0) at the top left. The
/// Y-coordinate is the row, and the X-coordinate is the column.
pub type Coordinates = Point2D<i32, CellSpace>;

/// Width and height of a frame, in cells.
pub type GridSize = Size2D<usize, CellSpace>;

/// Scales a single logical coordinate to a physical cell coordinate.
///
/// Fractional results are floored, so integral spacing is exact and fractional spacing never
/// lands past the cell it started in. Results past the range of `i32` saturate.
pub fn scale(coord: i32, spacing: f64) -> i32 {
    (f64::from(coord) * (spacing + 1.0)).floor() as i32
}

/// Extra cells inserted between logical units, per axis.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
}

impl Spacing {
    pub const fn new(x: f64, y: f64) -> Self {
        Spacing { x, y }
    }

    /// Spacing that maps logical coordinates one-to-one onto cells.
    pub const fn none() -> Self {
        Spacing::new(0.0, 0.0)
    }

    /// Converts a logical point to the coordinates of the cell it anchors.
    pub fn to_cells(self, point: LogicalPoint) -> Coordinates {
        Coordinates::new(scale(point.x, self.x), scale(point.y, self.y))
    }

    /// Converts a logical extent to a cell extent.
    pub fn extent_to_cells(self, extent: LogicalExtent) -> Vector2D<i32, CellSpace> {
        Vector2D::new(scale(extent.x, self.x), scale(extent.y, self.y))
    }

    /// Returns the number of cells needed to hold a logical grid of the given size.
    pub fn grid_size(self, inner: LogicalSize) -> GridSize {
        let cells = |len: u32, spacing: f64| (f64::from(len) * (spacing + 1.0)).floor().max(0.0) as usize;
        GridSize::new(cells(inner.width, self.x), cells(inner.height, self.y))
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::new(1.0, 0.0)
    }
}

impl From<[f64; 2]> for Spacing {
    fn from([x, y]: [f64; 2]) -> Self {
        Spacing::new(x, y)
    }
}
