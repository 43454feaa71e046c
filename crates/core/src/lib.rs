//! rostergrid - table grid reconstruction from vector-graphics PDF pages.
//!
//! A page is consumed as a stream of drawing events. Stroked lines are
//! intersected pairwise, the crossings clustered and snapped onto grid lines,
//! and the enclosed areas mapped onto rows and columns with spans before the
//! text of every cell is looked up.

pub mod debug;
pub mod error;
pub mod interp;
pub mod params;
pub mod table;
pub mod utils;

pub use error::{GridError, Result};
pub use params::DetectionParams;
pub use table::{Table, TableExtractor};
