//! Visual element extraction from a page's graphics event stream.
//!
//! Replays move/line/rectangle/paint events and collects the straight
//! segments that were actually stroked, the rectangles appended directly
//! and the positioned text runs.

use indexmap::IndexSet;
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::interp::GraphicsEvent;
use crate::utils::Matrix;

use super::geometry::{Line, Point, Rectangle};

/// Maximum distance of a curve's control points from its chord for the
/// curve to count as degenerate.
pub const DEFAULT_CURVE_LINEAR_TOLERANCE: f64 = 0.001;

/// A text string together with its text rendering matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub matrix: Matrix,
    pub text: String,
}

/// Lines, rectangles and text runs found on a page.
#[derive(Clone, Debug, Default)]
pub struct VisualElements {
    /// Distinct undirected lines in first-seen order; the position in the
    /// set is the line's `LineId`.
    pub lines: IndexSet<Line>,
    pub rectangles: Vec<Rectangle>,
    pub texts: Vec<TextRun>,
}

impl VisualElements {
    pub fn line_list(&self) -> Vec<Line> {
        self.lines.iter().copied().collect()
    }
}

type Subpath = SmallVec<[Point; 8]>;

#[derive(Default)]
struct PathState {
    subpaths: Vec<Subpath>,
}

impl PathState {
    fn move_to(&mut self, p: Point) {
        let mut subpath = Subpath::new();
        subpath.push(p);
        self.subpaths.push(subpath);
    }

    fn line_to(&mut self, p: Point) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(p),
            None => self.move_to(p),
        }
    }

    fn close(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut()
            && subpath.len() > 1
            && subpath.first() != subpath.last()
        {
            let first = subpath[0];
            subpath.push(first);
        }
    }

    fn current_point(&self) -> Option<Point> {
        self.subpaths.last().and_then(|s| s.last().copied())
    }

    fn stroke_into(&mut self, lines: &mut IndexSet<Line>) {
        for subpath in self.subpaths.drain(..) {
            for pair in subpath.windows(2) {
                lines.insert(Line::new(pair[0], pair[1]));
            }
        }
    }

    fn clear(&mut self) {
        self.subpaths.clear();
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    Line::new(a, b).closest_points(&Line::new(p, p)).0
}

/// A curve whose control points lie on its chord draws a straight segment
/// (or nothing at all).
fn is_degenerate_curve(start: Point, c1: Point, c2: Point, end: Point, tolerance: f64) -> bool {
    distance_to_segment(c1, start, end) <= tolerance
        && distance_to_segment(c2, start, end) <= tolerance
}

/// Collect the visual elements drawn by an event stream.
///
/// Paths are tracked as subpaths started by move-to; stroking walks every
/// subpath pairwise and emits one line per consecutive pair of points.
/// Filled or unpainted paths are discarded. Rectangles bypass path tracking
/// and contribute their four edges directly. A degenerate curve is treated
/// as a straight segment to its end point (nothing when it ends where it
/// starts); any other curve, clip, shading or image aborts the page.
pub fn extract_visual_elements<I>(events: I, curve_tolerance: f64) -> Result<VisualElements>
where
    I: IntoIterator<Item = GraphicsEvent>,
{
    let mut elements = VisualElements::default();
    let mut path = PathState::default();

    for (index, event) in events.into_iter().enumerate() {
        match event {
            GraphicsEvent::MoveTo(p) => path.move_to(p),
            GraphicsEvent::LineTo(p) => path.line_to(p),
            GraphicsEvent::ClosePath => path.close(),
            GraphicsEvent::CurveTo { c1, c2, end } => {
                let start = path.current_point();
                if !is_degenerate_curve(start.unwrap_or(c1), c1, c2, end, curve_tolerance) {
                    return Err(GridError::UnsupportedGraphicsOperation {
                        operation: "curve-to".to_string(),
                        index,
                    });
                }
                // A straight curve still moves the pen to its end point.
                if start != Some(end) {
                    path.line_to(end);
                }
            }
            GraphicsEvent::AppendRectangle(rect) => {
                for line in rect.lines() {
                    elements.lines.insert(line);
                }
                elements.rectangles.push(rect);
            }
            GraphicsEvent::ShowText { text, matrix } => {
                elements.texts.push(TextRun { matrix, text });
            }
            GraphicsEvent::StrokePath | GraphicsEvent::FillStrokePath => {
                path.stroke_into(&mut elements.lines);
            }
            GraphicsEvent::FillPath | GraphicsEvent::EndPath => path.clear(),
            event @ (GraphicsEvent::Clip
            | GraphicsEvent::ShadingFill
            | GraphicsEvent::DrawImage { .. }) => {
                return Err(GridError::UnsupportedGraphicsOperation {
                    operation: event.name().to_string(),
                    index,
                });
            }
        }
    }

    debug!(
        lines = elements.lines.len(),
        rectangles = elements.rectangles.len(),
        texts = elements.texts.len(),
        "extracted visual elements"
    );
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MATRIX_IDENTITY;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn extract(events: Vec<GraphicsEvent>) -> Result<VisualElements> {
        extract_visual_elements(events, DEFAULT_CURVE_LINEAR_TOLERANCE)
    }

    #[test]
    fn stroked_path_emits_consecutive_segments() {
        let out = extract(vec![
            GraphicsEvent::MoveTo(p(0.0, 0.0)),
            GraphicsEvent::LineTo(p(10.0, 0.0)),
            GraphicsEvent::LineTo(p(10.0, 10.0)),
            GraphicsEvent::StrokePath,
        ])
        .unwrap();
        assert_eq!(
            out.line_list(),
            vec![
                Line::new(p(0.0, 0.0), p(10.0, 0.0)),
                Line::new(p(10.0, 0.0), p(10.0, 10.0)),
            ]
        );
    }

    #[test]
    fn filled_path_is_discarded() {
        let out = extract(vec![
            GraphicsEvent::MoveTo(p(0.0, 0.0)),
            GraphicsEvent::LineTo(p(10.0, 0.0)),
            GraphicsEvent::FillPath,
            GraphicsEvent::StrokePath,
        ])
        .unwrap();
        assert!(out.lines.is_empty());
    }

    #[test]
    fn every_subpath_is_stroked() {
        let out = extract(vec![
            GraphicsEvent::MoveTo(p(0.0, 0.0)),
            GraphicsEvent::LineTo(p(10.0, 0.0)),
            GraphicsEvent::MoveTo(p(0.0, 5.0)),
            GraphicsEvent::LineTo(p(10.0, 5.0)),
            GraphicsEvent::ClosePath,
            GraphicsEvent::StrokePath,
        ])
        .unwrap();
        // The closed second subpath retraces itself and dedupes.
        assert_eq!(out.lines.len(), 2);
    }

    #[test]
    fn reversed_segments_dedupe() {
        let out = extract(vec![
            GraphicsEvent::MoveTo(p(0.0, 0.0)),
            GraphicsEvent::LineTo(p(10.0, 0.0)),
            GraphicsEvent::StrokePath,
            GraphicsEvent::MoveTo(p(10.0, 0.0)),
            GraphicsEvent::LineTo(p(0.0, 0.0)),
            GraphicsEvent::StrokePath,
        ])
        .unwrap();
        assert_eq!(out.lines.len(), 1);
    }

    #[test]
    fn rectangle_contributes_edges_without_painting() {
        let rect = Rectangle::new(p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(0.0, 2.0));
        let out = extract(vec![
            GraphicsEvent::AppendRectangle(rect),
            GraphicsEvent::FillPath,
        ])
        .unwrap();
        assert_eq!(out.lines.len(), 4);
        assert_eq!(out.rectangles, vec![rect]);
    }

    #[test]
    fn text_runs_pass_through() {
        let out = extract(vec![GraphicsEvent::ShowText {
            text: "Mon".to_string(),
            matrix: MATRIX_IDENTITY,
        }])
        .unwrap();
        assert_eq!(
            out.texts,
            vec![TextRun {
                matrix: MATRIX_IDENTITY,
                text: "Mon".to_string(),
            }]
        );
    }

    #[test]
    fn degenerate_curve_is_ignored() {
        let out = extract(vec![
            GraphicsEvent::MoveTo(p(5.0, 5.0)),
            GraphicsEvent::CurveTo {
                c1: p(5.0, 5.0),
                c2: p(5.0, 5.0),
                end: p(5.0, 5.0),
            },
            GraphicsEvent::StrokePath,
        ])
        .unwrap();
        assert!(out.lines.is_empty());
    }

    #[test]
    fn straight_curve_advances_the_path() {
        let out = extract(vec![
            GraphicsEvent::MoveTo(p(0.0, 0.0)),
            GraphicsEvent::CurveTo {
                c1: p(3.0, 0.0),
                c2: p(7.0, 0.0),
                end: p(10.0, 0.0),
            },
            GraphicsEvent::LineTo(p(10.0, 10.0)),
            GraphicsEvent::StrokePath,
        ])
        .unwrap();
        assert_eq!(
            out.line_list(),
            vec![
                Line::new(p(0.0, 0.0), p(10.0, 0.0)),
                Line::new(p(10.0, 0.0), p(10.0, 10.0)),
            ]
        );
    }

    #[test]
    fn real_curve_is_rejected() {
        let err = extract(vec![
            GraphicsEvent::MoveTo(p(0.0, 0.0)),
            GraphicsEvent::CurveTo {
                c1: p(0.0, 5.0),
                c2: p(10.0, 5.0),
                end: p(10.0, 0.0),
            },
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            GridError::UnsupportedGraphicsOperation { ref operation, index: 1 } if operation == "curve-to"
        ));
    }

    #[test]
    fn clip_and_images_are_rejected() {
        for event in [
            GraphicsEvent::Clip,
            GraphicsEvent::ShadingFill,
            GraphicsEvent::DrawImage {
                name: "Im0".to_string(),
            },
        ] {
            let err = extract(vec![event]).unwrap_err();
            assert!(matches!(
                err,
                GridError::UnsupportedGraphicsOperation { index: 0, .. }
            ));
        }
    }
}
