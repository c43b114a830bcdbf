//! Model Setup
//!
//! Grid population at initialization.

pub mod population;

pub use population::*;
