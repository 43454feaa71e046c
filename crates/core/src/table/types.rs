//! Table extraction types.

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::geometry::{LineId, Point};

// Key types for ordered float sets
pub(crate) type KeyF64 = OrderedFloat<f64>;

pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v + 0.0)
}

/// A place where two or more lines cross, after deduplication.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionPoint {
    /// Raw (or cluster-averaged) crossing point.
    pub midpoint: Point,
    /// Lines passing through this point.
    pub lines: BTreeSet<LineId>,
}

impl IntersectionPoint {
    pub fn new(midpoint: Point, lines: impl IntoIterator<Item = LineId>) -> Self {
        Self {
            midpoint,
            lines: lines.into_iter().collect(),
        }
    }
}

/// Canonical row and column boundaries of a page, both sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLines {
    /// Row boundaries (y-values).
    pub horizontal: Vec<f64>,
    /// Column boundaries (x-values).
    pub vertical: Vec<f64>,
}

impl GridLines {
    pub(crate) fn from_sets(horizontal: BTreeSet<KeyF64>, vertical: BTreeSet<KeyF64>) -> Self {
        Self {
            horizontal: horizontal.into_iter().map(|k| k.into_inner()).collect(),
            vertical: vertical.into_iter().map(|k| k.into_inner()).collect(),
        }
    }
}

/// Result of grid alignment: the grid plus the snapped coordinate of every
/// input intersection, indexed like the input slice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridAlignment {
    pub grid: GridLines,
    pub aligned: Vec<Point>,
}

/// Axis-aligned rectangle bounded by four grid lines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclosedArea {
    pub lower_x: f64,
    pub upper_x: f64,
    pub lower_y: f64,
    pub upper_y: f64,
}

impl EnclosedArea {
    pub(crate) fn key(&self) -> (KeyF64, KeyF64, KeyF64, KeyF64) {
        (
            key_f64(self.lower_x),
            key_f64(self.upper_x),
            key_f64(self.lower_y),
            key_f64(self.upper_y),
        )
    }
}

/// Position of a cell in the logical table grid.
///
/// Indices are positions within the sorted grid-line lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellLocation {
    pub row: usize,
    pub row_span: usize,
    pub column: usize,
    pub column_span: usize,
}

/// One extracted table cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub column_span: usize,
    pub text: String,
}

/// One table row; cells are sorted by column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub index: usize,
    pub cells: Vec<Cell>,
}

/// Extracted table: rows sorted by row index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    /// Find the cell anchored at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows
            .iter()
            .find(|r| r.index == row)?
            .cells
            .iter()
            .find(|c| c.column == column)
    }

    /// Cell texts per row, in order.
    pub fn texts(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }
}
