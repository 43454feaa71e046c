//! Graphics events and the page collaborator interfaces.
//!
//! A page is seen by the extractor only through two traits: a source of
//! typed drawing events and a text-region extractor. How the events are
//! produced (content-stream interpretation, replay of a recording) is up to
//! the implementor.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{BBox, Point, Rectangle};
use crate::utils::Matrix;

/// One drawing operation replayed from a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GraphicsEvent {
    /// Begin a new subpath at the point.
    MoveTo(Point),
    /// Append a straight segment to the current subpath.
    LineTo(Point),
    /// Append a cubic Bézier segment (two control points, end point).
    CurveTo { c1: Point, c2: Point, end: Point },
    /// Close the current subpath back to its first point.
    ClosePath,
    /// Append a rectangle as a complete subpath.
    AppendRectangle(Rectangle),
    /// Draw a text string with its text rendering matrix.
    ShowText { text: String, matrix: Matrix },
    /// Fill the current path.
    FillPath,
    /// Stroke the current path.
    StrokePath,
    /// Fill and then stroke the current path.
    FillStrokePath,
    /// End the path without painting it.
    EndPath,
    /// Intersect the clipping path with the current path.
    Clip,
    /// Paint a shading over the clip region.
    ShadingFill,
    /// Paint an image XObject or inline image.
    DrawImage { name: String },
}

impl GraphicsEvent {
    /// Operator-style name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            GraphicsEvent::MoveTo(_) => "move-to",
            GraphicsEvent::LineTo(_) => "line-to",
            GraphicsEvent::CurveTo { .. } => "curve-to",
            GraphicsEvent::ClosePath => "close-path",
            GraphicsEvent::AppendRectangle(_) => "append-rectangle",
            GraphicsEvent::ShowText { .. } => "show-text",
            GraphicsEvent::FillPath => "fill-path",
            GraphicsEvent::StrokePath => "stroke-path",
            GraphicsEvent::FillStrokePath => "fill-stroke-path",
            GraphicsEvent::EndPath => "end-path",
            GraphicsEvent::Clip => "clip",
            GraphicsEvent::ShadingFill => "shading-fill",
            GraphicsEvent::DrawImage { .. } => "draw-image",
        }
    }
}

/// Source of a page's drawing operations, in drawing order.
pub trait GraphicsEventSource {
    fn graphics_events(&self) -> Result<Vec<GraphicsEvent>>;
}

/// Extracts the text drawn inside an axis-aligned region of a page.
pub trait TextRegionExtractor {
    fn text_in_region(&self, region: BBox) -> Result<String>;
}

/// A page usable by the table extractor.
pub trait PageSource: GraphicsEventSource + TextRegionExtractor {}

impl<T: GraphicsEventSource + TextRegionExtractor + ?Sized> PageSource for T {}
