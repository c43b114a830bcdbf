//! Schelling Segregation Simulation Engine
//!
//! Agents of two kinds live on a bounded grid and move whenever their
//! neighborhood is too dissimilar, with a more tolerant rule near two city
//! centers. The engine is a synchronous, step-driven state machine; renderers
//! read its state through [`output`] snapshots.

use rand::rngs::SmallRng;
use rand::SeedableRng;

pub mod components;
pub mod config;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{Config, ConfigError, ModelConfig, RunConfig};
pub use simulation::{Phase, SimError, Simulation};
pub use systems::{Evaluation, NeighborCounts, SatisfactionRule, NEAR_CITY_RATIO};

pub use schelling_events::StepRecord;

/// Seeded random number generator shared by setup and scheduling
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, otherwise drawn from OS entropy
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seed_from_u64(seed),
            None => Self(SmallRng::from_entropy()),
        }
    }
}
