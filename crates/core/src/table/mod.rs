//! Table extraction from vector-graphics grids.
//!
//! This module reconstructs the logical table of a page purely from its
//! stroked lines: line extraction, intersection detection, clustering,
//! grid alignment, enclosed-area search, cell location and text assembly.

pub(crate) mod clustering;
mod correction;
mod elements;
mod finder;
mod geometry;
mod graph;
mod grid;
mod intersections;
mod text;
mod types;

// Re-export public types
pub use correction::{CellCorrection, HeaderNudge, NoCorrection};
pub use elements::{DEFAULT_CURVE_LINEAR_TOLERANCE, TextRun, VisualElements};
pub use geometry::{BBox, Line, LineId, Point, Rectangle};
pub use graph::LineGraph;
pub use types::{
    Cell, CellLocation, EnclosedArea, GridAlignment, GridLines, IntersectionPoint, Row, Table,
};

// Re-export public API functions
pub use clustering::{cluster_objects, deduplicate_intersections};
pub use elements::extract_visual_elements;
pub use finder::{GridDetection, TableExtractor};
pub use grid::{align_intersections, find_enclosed_areas, locate_cell, locate_cells};
pub use intersections::detect_intersections;
pub use text::{assemble_table, cell_region, normalize_cell_text};
