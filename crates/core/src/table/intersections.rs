//! Pairwise line intersection detection.
//!
//! Every unordered pair of lines is tested once, so the cost is quadratic
//! in the line count. Table pages carry at most a few hundred lines, where a
//! plain double loop is fast enough.
// TODO: bucket lines by bounding box (rstar) if multi-thousand-line pages show up.

use tracing::debug;

use super::geometry::{Line, LineId};
use super::types::IntersectionPoint;

/// Find every pair of lines passing within `tolerance` of each other.
///
/// The intersection point is the midpoint of the two closest points, one on
/// each segment, and owns both lines. Results are ordered by `(i, j)` with
/// `i < j` indexing into `lines`.
pub fn detect_intersections(lines: &[Line], tolerance: f64) -> Vec<IntersectionPoint> {
    let mut out = Vec::new();
    for (i, a) in lines.iter().enumerate() {
        for (j, b) in lines.iter().enumerate().skip(i + 1) {
            let (distance, on_a, on_b) = a.closest_points(b);
            if distance <= tolerance {
                out.push(IntersectionPoint::new(
                    on_a.midpoint(&on_b),
                    [LineId(i), LineId(j)],
                ));
            }
        }
    }
    debug!(
        lines = lines.len(),
        intersections = out.len(),
        "detected line intersections"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::geometry::Point;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn unit_square_has_four_corners() {
        let lines = vec![
            line(0.0, 0.0, 10.0, 0.0),
            line(10.0, 0.0, 10.0, 10.0),
            line(10.0, 10.0, 0.0, 10.0),
            line(0.0, 10.0, 0.0, 0.0),
        ];
        let found = detect_intersections(&lines, 0.1);
        assert_eq!(found.len(), 4);
        let mut corners: Vec<(f64, f64)> =
            found.iter().map(|p| (p.midpoint.x, p.midpoint.y)).collect();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![(0.0, 0.0), (0.0, 10.0), (10.0, 0.0), (10.0, 10.0)]
        );
        for p in &found {
            assert_eq!(p.lines.len(), 2);
        }
    }

    #[test]
    fn near_miss_within_tolerance_uses_midpoint() {
        let lines = vec![line(0.0, 5.0, 10.0, 5.0), line(10.4, 0.0, 10.4, 10.0)];
        assert!(detect_intersections(&lines, 0.1).is_empty());
        let found = detect_intersections(&lines, 0.5);
        assert_eq!(found.len(), 1);
        assert!((found[0].midpoint.x - 10.2).abs() < 1e-9);
        assert!((found[0].midpoint.y - 5.0).abs() < 1e-9);
        assert_eq!(
            found[0].lines.iter().copied().collect::<Vec<_>>(),
            vec![LineId(0), LineId(1)]
        );
    }

    #[test]
    fn no_self_pairs() {
        let lines = vec![line(0.0, 0.0, 10.0, 0.0)];
        assert!(detect_intersections(&lines, 1.0).is_empty());
    }
}
