//! Geometric primitives for grid detection.
//!
//! Coordinates are in top-left-origin page space: x grows to the right and
//! y grows downwards, so smaller y means closer to the top of the page.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Bit pattern used for exact hashing; `-0.0` folds onto `0.0`.
    pub(crate) fn key(&self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

/// Index of a line in the per-page line arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LineId(pub usize);

/// An undirected line segment.
///
/// Equality and hashing ignore direction: a segment and its reverse are the
/// same line.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub finish: Point,
}

impl Line {
    pub const fn new(start: Point, finish: Point) -> Self {
        Self { start, finish }
    }

    fn endpoint_keys(&self) -> ((u64, u64), (u64, u64)) {
        let a = self.start.key();
        let b = self.finish.key();
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Closest points between two finite segments.
    ///
    /// Returns `(distance, point_on_self, point_on_other)`. Parallel,
    /// overlapping and zero-length segments are handled without dividing by
    /// zero.
    pub fn closest_points(&self, other: &Line) -> (f64, Point, Point) {
        const EPS: f64 = 1e-12;

        let p1 = self.start;
        let p2 = other.start;
        let d1 = (self.finish.x - p1.x, self.finish.y - p1.y);
        let d2 = (other.finish.x - p2.x, other.finish.y - p2.y);
        let r = (p1.x - p2.x, p1.y - p2.y);
        let a = dot(d1, d1);
        let e = dot(d2, d2);
        let f = dot(d2, r);

        let (s, t) = if a <= EPS && e <= EPS {
            (0.0, 0.0)
        } else if a <= EPS {
            (0.0, (f / e).clamp(0.0, 1.0))
        } else {
            let c = dot(d1, r);
            if e <= EPS {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else {
                let b = dot(d1, d2);
                let denom = a * e - b * b;
                // Parallel segments: any s works, pin it to the start of self.
                let mut s = if denom > EPS {
                    ((b * f - c * e) / denom).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let mut t = (b * s + f) / e;
                if t < 0.0 {
                    t = 0.0;
                    s = (-c / a).clamp(0.0, 1.0);
                } else if t > 1.0 {
                    t = 1.0;
                    s = ((b - c) / a).clamp(0.0, 1.0);
                }
                (s, t)
            }
        };

        let c1 = p1.lerp(&self.finish, s);
        let c2 = p2.lerp(&other.finish, t);
        (c1.distance(&c2), c1, c2)
    }
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint_keys() == other.endpoint_keys()
    }
}

impl Eq for Line {}

impl Hash for Line {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoint_keys().hash(state);
    }
}

/// A closed quadrilateral with corners in winding order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Rectangle {
    pub const fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// The four edges as a closed cycle p0→p1→p2→p3→p0.
    pub fn lines(&self) -> [Line; 4] {
        [
            Line::new(self.p0, self.p1),
            Line::new(self.p1, self.p2),
            Line::new(self.p2, self.p3),
            Line::new(self.p3, self.p0),
        ]
    }
}

/// Axis-aligned bounding box in top-left page space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}
