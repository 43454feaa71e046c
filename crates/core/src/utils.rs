//! Miscellaneous numeric routines.
//!
//! Provides the affine matrix helpers used to position text runs and the
//! rounding/comparison helpers shared by the clustering stages.

use std::cmp::Ordering;

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// A 6-element affine transformation matrix (a, b, c, d, e, f).
/// Transforms point (x, y) to (ax + cy + e, bx + dy + f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Total order for finite coordinates; NaN compares equal.
#[inline]
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Round to the nearest 1/8 unit.
///
/// Cluster averages are rounded this way so that coordinates stay stable
/// across runs and readable in debug output.
#[inline]
pub fn round_to_eighth(value: f64) -> f64 {
    (value * 8.0).round() / 8.0
}

/// Multiplies two matrices: result = m1 * m0.
/// The product applies m1 first, then m0 (row-vector convention).
pub fn mult_matrix(m1: Matrix, m0: Matrix) -> Matrix {
    let (a1, b1, c1, d1, e1, f1) = m1;
    let (a0, b0, c0, d0, e0, f0) = m0;
    (
        a0 * a1 + c0 * b1,
        b0 * a1 + d0 * b1,
        a0 * c1 + c0 * d1,
        b0 * c1 + d0 * d1,
        a0 * e1 + c0 * f1 + e0,
        b0 * e1 + d0 * f1 + f0,
    )
}

/// Translates a matrix by (x, y) inside the projection.
pub fn translate_matrix(m: Matrix, x: f64, y: f64) -> Matrix {
    let (a, b, c, d, e, f) = m;
    (a, b, c, d, x * a + y * c + e, x * b + y * d + f)
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, x: f64, y: f64) -> (f64, f64) {
    let (a, b, c, d, e, f) = m;
    (a * x + c * y + e, b * x + d * y + f)
}
