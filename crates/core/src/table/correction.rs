//! Per-format corrections applied to cell regions before text lookup.

use serde::{Deserialize, Serialize};

use super::geometry::BBox;
use super::types::CellLocation;

/// Adjusts the text-lookup region of a cell.
pub trait CellCorrection: Send + Sync {
    fn adjust(&self, location: &CellLocation, region: BBox) -> BBox;
}

/// Leaves every region as computed from the grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCorrection;

impl CellCorrection for NoCorrection {
    fn adjust(&self, _location: &CellLocation, region: BBox) -> BBox {
        region
    }
}

/// Shifts the left edge of header cells.
///
/// Applies to cells anchored in the first `rows` rows and the first
/// `columns` columns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaderNudge {
    pub rows: usize,
    pub columns: usize,
    pub dx: f64,
}

impl HeaderNudge {
    /// The roster exporter draws its header text one unit left of the grid.
    pub const fn roster_export() -> Self {
        Self {
            rows: 3,
            columns: 2,
            dx: -1.0,
        }
    }
}

impl CellCorrection for HeaderNudge {
    fn adjust(&self, location: &CellLocation, region: BBox) -> BBox {
        if location.row < self.rows && location.column < self.columns {
            BBox {
                x0: region.x0 + self.dx,
                ..region
            }
        } else {
            region
        }
    }
}
