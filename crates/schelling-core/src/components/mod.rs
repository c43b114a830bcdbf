//! Simulation Components
//!
//! Data types for the grid, agents and city centers.

pub mod agent;
pub mod city;
pub mod grid;

pub use agent::*;
pub use city::*;
pub use grid::*;
