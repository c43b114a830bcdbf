//! Output Generation
//!
//! Grid snapshots for renderers and summary statistics.

pub mod snapshot;
pub mod stats;

pub use snapshot::*;
pub use stats::*;
