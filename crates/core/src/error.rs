//! Error types for rostergrid table extraction.

use thiserror::Error;

/// Grid axis named in grid-consistency errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Row boundaries (y-values).
    Horizontal,
    /// Column boundaries (x-values).
    Vertical,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// Primary error type for page extraction.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("unsupported graphics operation `{operation}` at event {index}")]
    UnsupportedGraphicsOperation { operation: String, index: usize },

    #[error("malformed grid: no {axis} grid line bounds {value} ({reason})")]
    MalformedGrid {
        axis: Axis,
        value: f64,
        reason: &'static str,
    },

    #[error("page contains no enclosed table cells")]
    EmptyGrid,

    #[error("text region extraction failed: {0}")]
    TextRegion(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type alias for GridError.
pub type Result<T> = std::result::Result<T, GridError>;
