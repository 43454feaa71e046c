//! Grid construction from deduplicated intersections.
//!
//! Alignment snaps intersection coordinates onto canonical grid lines,
//! enclosed-area search pairs each intersection with its nearest right and
//! lower neighbours, and the cell locator turns areas into row/column
//! positions within the grid.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{Axis, GridError, Result};
use crate::utils::{EPSILON, round_to_eighth};

use super::geometry::Point;
use super::types::{
    CellLocation, EnclosedArea, GridAlignment, GridLines, IntersectionPoint, KeyF64, key_f64,
};

/// Snap one axis. Returns the aligned value per input and the set of grid
/// positions.
///
/// Points are visited in input order. An unaligned point gathers every point
/// (aligned or not) within `tolerance` on this axis and the rounded mean of
/// the gathered values becomes a grid position. Only the gathered points
/// without a value yet take it, so each point is written exactly once and
/// belongs to the group of whichever point reached it first.
fn align_axis(values: &[f64], tolerance: f64) -> (Vec<f64>, BTreeSet<KeyF64>) {
    let mut aligned: Vec<Option<f64>> = vec![None; values.len()];
    let mut grid = BTreeSet::new();

    for (i, &value) in values.iter().enumerate() {
        if aligned[i].is_some() {
            continue;
        }
        let group: SmallVec<[usize; 16]> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| (*v - value).abs() <= tolerance)
            .map(|(j, _)| j)
            .collect();
        let sum: f64 = group.iter().map(|&j| values[j]).sum();
        let mean = round_to_eighth(sum / group.len() as f64);
        for &j in &group {
            aligned[j].get_or_insert(mean);
        }
        grid.insert(key_f64(mean));
    }

    let aligned = aligned
        .into_iter()
        .zip(values)
        .map(|(a, v)| a.unwrap_or(*v))
        .collect();
    (aligned, grid)
}

/// Snap intersection coordinates onto canonical grid lines.
///
/// The axes are aligned independently: a point belongs to one vertical and
/// one horizontal group. The input is left untouched; the aligned position of
/// `points[i]` is `aligned[i]` in the result.
pub fn align_intersections(points: &[IntersectionPoint], tolerance: f64) -> GridAlignment {
    let xs: Vec<f64> = points.iter().map(|p| p.midpoint.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.midpoint.y).collect();
    let (aligned_x, vertical) = align_axis(&xs, tolerance);
    let (aligned_y, horizontal) = align_axis(&ys, tolerance);

    let aligned = aligned_x
        .into_iter()
        .zip(aligned_y)
        .map(|(x, y)| Point::new(x, y))
        .collect();
    let grid = GridLines::from_sets(horizontal, vertical);
    debug!(
        points = points.len(),
        horizontal = grid.horizontal.len(),
        vertical = grid.vertical.len(),
        "aligned intersections to grid"
    );
    GridAlignment { grid, aligned }
}

/// Find the minimal cell whose top-left corner is each intersection.
///
/// The right edge is the nearest intersection further right on the same row,
/// the bottom edge the nearest one further down in the same column (both
/// within `tolerance` of the row/column and more than `tolerance` away along
/// the other axis). Intersections on the last row or column yield nothing.
/// Identical areas are reported once, in first-seen order.
pub fn find_enclosed_areas(aligned: &[Point], tolerance: f64) -> Vec<EnclosedArea> {
    let mut areas: IndexMap<_, EnclosedArea> = IndexMap::new();

    for (i, p) in aligned.iter().enumerate() {
        let others = aligned
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, q)| q);

        let mut next_x: Option<f64> = None;
        let mut next_y: Option<f64> = None;
        for q in others {
            if (q.y - p.y).abs() <= tolerance && q.x - p.x > tolerance {
                next_x = Some(next_x.map_or(q.x, |x| x.min(q.x)));
            }
            if (q.x - p.x).abs() <= tolerance && q.y - p.y > tolerance {
                next_y = Some(next_y.map_or(q.y, |y| y.min(q.y)));
            }
        }

        if let (Some(upper_x), Some(upper_y)) = (next_x, next_y) {
            let area = EnclosedArea {
                lower_x: p.x,
                upper_x,
                lower_y: p.y,
                upper_y,
            };
            areas.entry(area.key()).or_insert(area);
        }
    }

    debug!(areas = areas.len(), "found enclosed areas");
    areas.into_values().collect()
}

/// Index range `[start, end]` of grid lines bounding `lower..upper`.
fn locate_span(lines: &[f64], lower: f64, upper: f64, axis: Axis) -> Result<(usize, usize)> {
    let below = lines.partition_point(|&v| v <= lower + EPSILON);
    if below == 0 {
        return Err(GridError::MalformedGrid {
            axis,
            value: lower,
            reason: "no grid line at or before the lower edge",
        });
    }
    let start = below - 1;

    let end = lines.partition_point(|&v| v < upper - EPSILON);
    if end == lines.len() {
        return Err(GridError::MalformedGrid {
            axis,
            value: upper,
            reason: "no grid line at or after the upper edge",
        });
    }
    if end <= start {
        return Err(GridError::MalformedGrid {
            axis,
            value: upper,
            reason: "cell span is not positive",
        });
    }
    Ok((start, end))
}

/// Map an enclosed area onto its row/column position in the grid.
///
/// The start index is the last grid line at or before the lower edge and the
/// end index the first grid line at or after the upper edge. A missing line
/// means the grid is inconsistent and is reported rather than clamped.
pub fn locate_cell(area: &EnclosedArea, grid: &GridLines) -> Result<CellLocation> {
    let (column, column_end) =
        locate_span(&grid.vertical, area.lower_x, area.upper_x, Axis::Vertical)?;
    let (row, row_end) =
        locate_span(&grid.horizontal, area.lower_y, area.upper_y, Axis::Horizontal)?;
    Ok(CellLocation {
        row,
        row_span: row_end - row,
        column,
        column_span: column_end - column,
    })
}

/// Locate every area, dropping duplicate locations.
pub fn locate_cells(areas: &[EnclosedArea], grid: &GridLines) -> Result<Vec<CellLocation>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(areas.len());
    for area in areas {
        let location = locate_cell(area, grid)?;
        if seen.insert(location) {
            out.push(location);
        }
    }
    Ok(out)
}
