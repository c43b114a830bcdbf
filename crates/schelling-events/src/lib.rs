//! Shared snapshot types for the Schelling segregation simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers and reporters depend on it to read simulation state without
//! pulling in the engine.

pub mod history;
pub mod snapshot;

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AgentKind, CellSnapshot, GridSnapshot, PointSnapshot,
};

// Re-export history types
pub use history::{HappyHistory, StepRecord};
