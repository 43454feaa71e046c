//! TableExtractor orchestrator and public API for table extraction.
//!
//! Runs the grid pipeline for one page: visual elements, pairwise
//! intersections, deduplication, alignment, enclosed areas, cell locations
//! and finally text assembly. Pages share no state, so a document can be
//! processed page-parallel.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::debug::{Color, DebugSink, NoopSink};
use crate::error::{GridError, Result};
use crate::interp::{GraphicsEvent, PageSource};
use crate::params::DetectionParams;

use super::clustering::deduplicate_intersections;
use super::correction::{CellCorrection, NoCorrection};
use super::elements::{VisualElements, extract_visual_elements};
use super::geometry::{BBox, Line, LineId, Point};
use super::graph::LineGraph;
use super::grid::{align_intersections, find_enclosed_areas, locate_cells};
use super::intersections::detect_intersections;
use super::text::assemble_table;
use super::types::{CellLocation, EnclosedArea, GridAlignment, IntersectionPoint, Table};

const INTERSECTION_MARK_RADIUS: f64 = 2.0;

/// Intermediate results of grid detection for one page.
#[derive(Clone, Debug)]
pub struct GridDetection {
    pub elements: VisualElements,
    /// Deduplicated intersections.
    pub intersections: Vec<IntersectionPoint>,
    pub alignment: GridAlignment,
    pub areas: Vec<EnclosedArea>,
    pub cells: Vec<CellLocation>,
}

/// Extracts one table per page.
pub struct TableExtractor {
    params: DetectionParams,
    correction: Box<dyn CellCorrection>,
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new(DetectionParams::default())
    }
}

impl TableExtractor {
    /// Create an extractor; the header nudge in `params`, if any, becomes the
    /// cell correction.
    pub fn new(params: DetectionParams) -> Self {
        let correction: Box<dyn CellCorrection> = match params.header_nudge {
            Some(nudge) => Box::new(nudge),
            None => Box::new(NoCorrection),
        };
        Self { params, correction }
    }

    /// Replace the cell correction.
    pub fn with_correction(mut self, correction: impl CellCorrection + 'static) -> Self {
        self.correction = Box::new(correction);
        self
    }

    /// Run grid detection (stages up to cell location) over an event stream.
    pub fn detect_grid(
        &self,
        events: Vec<GraphicsEvent>,
        sink: &mut dyn DebugSink,
    ) -> Result<GridDetection> {
        let p = &self.params;

        let elements = extract_visual_elements(events, p.curve_linear_tolerance)?;
        let lines = elements.line_list();
        sink.begin_layer("lines");
        for line in &lines {
            sink.line(line.start, line.finish, Color::RED);
        }

        let raw = detect_intersections(&lines, p.intersection_tolerance);
        let intersections = deduplicate_intersections(&raw, p.dedup_tolerance);
        debug!(
            raw = raw.len(),
            deduplicated = intersections.len(),
            "clustered intersections"
        );
        sink.begin_layer("intersections");
        for point in &intersections {
            sink.ellipse(
                point.midpoint,
                INTERSECTION_MARK_RADIUS,
                INTERSECTION_MARK_RADIUS,
                Color::GREEN,
            );
        }
        report_components(&lines, &intersections);

        let alignment = align_intersections(&intersections, p.alignment_tolerance);
        draw_grid(sink, &alignment);

        let areas = find_enclosed_areas(&alignment.aligned, p.area_tolerance);
        sink.begin_layer("areas");
        for area in &areas {
            sink.rect(
                BBox {
                    x0: area.lower_x,
                    top: area.lower_y,
                    x1: area.upper_x,
                    bottom: area.upper_y,
                },
                Color::ORANGE,
            );
        }
        if areas.is_empty() {
            return Err(GridError::EmptyGrid);
        }

        let cells = locate_cells(&areas, &alignment.grid)?;
        debug!(cells = cells.len(), "located cells");

        Ok(GridDetection {
            elements,
            intersections,
            alignment,
            areas,
            cells,
        })
    }

    /// Extract the table of one page.
    pub fn extract_table<P: PageSource + ?Sized>(&self, page: &P) -> Result<Table> {
        self.extract_table_with_sink(page, &mut NoopSink)
    }

    /// Extract the table of one page, reporting stages to `sink`.
    pub fn extract_table_with_sink<P: PageSource + ?Sized>(
        &self,
        page: &P,
        sink: &mut dyn DebugSink,
    ) -> Result<Table> {
        let events = page.graphics_events()?;
        let detection = self.detect_grid(events, sink)?;
        assemble_table(
            page,
            &detection.cells,
            &detection.alignment.grid,
            self.correction.as_ref(),
        )
    }

    /// Extract every page in parallel; results keep page order.
    pub fn extract_tables<P: PageSource + Sync>(&self, pages: &[P]) -> Vec<Result<Table>> {
        pages.par_iter().map(|page| self.extract_table(page)).collect()
    }
}

/// Log how many disjoint stroke groups the page has.
fn report_components(lines: &[Line], intersections: &[IntersectionPoint]) {
    let mut graph = LineGraph::from_lines(lines);
    for point in intersections {
        let owned = point
            .lines
            .iter()
            .filter_map(|&LineId(i)| lines.get(i));
        graph.add_junction(point.midpoint, owned);
    }
    let components = graph.components().len();
    if components > 1 {
        warn!(
            components,
            "page strokes form disjoint groups; treating them as one grid"
        );
    } else {
        debug!(components, "line graph connectivity");
    }
}

fn draw_grid(sink: &mut dyn DebugSink, alignment: &GridAlignment) {
    let grid = &alignment.grid;
    sink.begin_layer("alignment");
    let (Some(&left), Some(&right)) = (grid.vertical.first(), grid.vertical.last()) else {
        return;
    };
    let (Some(&top), Some(&bottom)) = (grid.horizontal.first(), grid.horizontal.last()) else {
        return;
    };
    for &y in &grid.horizontal {
        sink.line(Point::new(left, y), Point::new(right, y), Color::BLUE);
    }
    for &x in &grid.vertical {
        sink.line(Point::new(x, top), Point::new(x, bottom), Color::BLUE);
    }
}
