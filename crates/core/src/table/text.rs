//! Cell text lookup and table assembly.

use itertools::Itertools;
use tracing::debug;

use crate::error::{Axis, GridError, Result};
use crate::interp::TextRegionExtractor;

use super::correction::CellCorrection;
use super::geometry::BBox;
use super::types::{Cell, CellLocation, GridLines, Row, Table};

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_cell_text(raw: &str) -> String {
    raw.split_whitespace().join(" ")
}

fn grid_value(lines: &[f64], index: usize, axis: Axis) -> Result<f64> {
    lines.get(index).copied().ok_or(GridError::MalformedGrid {
        axis,
        value: index as f64,
        reason: "cell index beyond the last grid line",
    })
}

/// Page region covered by a cell location.
pub fn cell_region(location: &CellLocation, grid: &GridLines) -> Result<BBox> {
    Ok(BBox {
        x0: grid_value(&grid.vertical, location.column, Axis::Vertical)?,
        x1: grid_value(
            &grid.vertical,
            location.column + location.column_span,
            Axis::Vertical,
        )?,
        top: grid_value(&grid.horizontal, location.row, Axis::Horizontal)?,
        bottom: grid_value(
            &grid.horizontal,
            location.row + location.row_span,
            Axis::Horizontal,
        )?,
    })
}

/// Build the table by looking up the text of every located cell.
///
/// Rows are ordered by row index and cells within a row by column index;
/// spans are carried over from the locations.
pub fn assemble_table<P>(
    page: &P,
    locations: &[CellLocation],
    grid: &GridLines,
    correction: &dyn CellCorrection,
) -> Result<Table>
where
    P: TextRegionExtractor + ?Sized,
{
    let mut cells = Vec::with_capacity(locations.len());
    for location in locations {
        let region = correction.adjust(location, cell_region(location, grid)?);
        let raw = page.text_in_region(region)?;
        cells.push(Cell {
            row: location.row,
            column: location.column,
            row_span: location.row_span,
            column_span: location.column_span,
            text: normalize_cell_text(&raw),
        });
    }

    let by_row = cells
        .into_iter()
        .sorted_by_key(|c| (c.row, c.column))
        .chunk_by(|c| c.row);
    let rows: Vec<Row> = by_row
        .into_iter()
        .map(|(index, group)| Row {
            index,
            cells: group.collect(),
        })
        .collect();

    debug!(rows = rows.len(), cells = locations.len(), "assembled table");
    Ok(Table { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::correction::{HeaderNudge, NoCorrection};
    use std::cell::RefCell;

    /// Returns canned text and remembers the regions it was asked for.
    struct CannedText {
        text: String,
        regions: RefCell<Vec<BBox>>,
    }

    impl TextRegionExtractor for CannedText {
        fn text_in_region(&self, region: BBox) -> Result<String> {
            self.regions.borrow_mut().push(region);
            Ok(self.text.clone())
        }
    }

    fn canned(text: &str) -> CannedText {
        CannedText {
            text: text.to_string(),
            regions: RefCell::new(Vec::new()),
        }
    }

    fn grid() -> GridLines {
        GridLines {
            horizontal: vec![0.0, 10.0, 20.0],
            vertical: vec![0.0, 30.0, 60.0, 90.0],
        }
    }

    fn loc(row: usize, row_span: usize, column: usize, column_span: usize) -> CellLocation {
        CellLocation {
            row,
            row_span,
            column,
            column_span,
        }
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(normalize_cell_text("  Employee   Name \n"), "Employee Name");
        assert_eq!(normalize_cell_text("\t\n"), "");
    }

    #[test]
    fn spanning_cell_text_is_normalized() {
        let page = canned("  Employee   Name \n");
        let table =
            assemble_table(&page, &[loc(0, 2, 0, 3)], &grid(), &NoCorrection).unwrap();
        let cell = table.cell(0, 0).unwrap();
        assert_eq!(cell.text, "Employee Name");
        assert_eq!((cell.row_span, cell.column_span), (2, 3));
        assert_eq!(
            page.regions.borrow()[0],
            BBox {
                x0: 0.0,
                top: 0.0,
                x1: 90.0,
                bottom: 20.0,
            }
        );
    }

    #[test]
    fn rows_and_columns_are_sorted() {
        let page = canned("x");
        let locations = [loc(1, 1, 2, 1), loc(0, 1, 1, 2), loc(1, 1, 0, 1), loc(0, 1, 0, 1)];
        let table = assemble_table(&page, &locations, &grid(), &NoCorrection).unwrap();
        let anchors: Vec<Vec<(usize, usize)>> = table
            .rows
            .iter()
            .map(|r| r.cells.iter().map(|c| (c.row, c.column)).collect())
            .collect();
        assert_eq!(anchors, vec![vec![(0, 0), (0, 1)], vec![(1, 0), (1, 2)]]);
        assert_eq!(table.cell_count(), 4);
    }

    #[test]
    fn correction_moves_lookup_region() {
        let page = canned("");
        let nudge = HeaderNudge::roster_export();
        assemble_table(&page, &[loc(0, 1, 1, 1), loc(1, 1, 2, 1)], &grid(), &nudge).unwrap();
        let regions = page.regions.borrow();
        assert_eq!(regions[0].x0, 29.0);
        assert_eq!(regions[1].x0, 60.0);
    }

    #[test]
    fn location_beyond_grid_is_malformed() {
        let page = canned("");
        let err = assemble_table(&page, &[loc(1, 2, 0, 1)], &grid(), &NoCorrection).unwrap_err();
        assert!(matches!(
            err,
            GridError::MalformedGrid {
                axis: Axis::Horizontal,
                ..
            }
        ));
    }
}
