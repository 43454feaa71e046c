//! Page interpretation boundary.
//!
//! This module contains:
//! - `event`: graphics events and the collaborator traits a page implements
//! - `recorded`: a replayable in-memory page

pub mod event;
pub mod recorded;

// Re-export main types for convenience
pub use event::{GraphicsEvent, GraphicsEventSource, PageSource, TextRegionExtractor};
pub use recorded::{DEFAULT_LINE_TOLERANCE, Glyph, RecordedPage, load_pages, save_pages};
