//! Simulation Systems
//!
//! The relocation decision rule and the per-step activation schedule.

pub mod satisfaction;
pub mod schedule;

pub use satisfaction::*;
pub use schedule::*;
