//! Population Spawning
//!
//! Walks every cell once in row-major order. Each cell is occupied with
//! probability `density`, and each new agent is a minority with probability
//! `minority_pc`.

use rand::Rng;

use crate::components::agent::{Agent, AgentId, AgentKind};
use crate::components::grid::{Grid, GridError, Occupant, Position};

/// Per-population counts after spawning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub majority: usize,
    pub minority: usize,
}

impl SpawnSummary {
    pub fn from_agents(agents: &[Agent]) -> Self {
        let minority = agents.iter().filter(|a| a.is_minority()).count();
        Self {
            total_agents: agents.len(),
            majority: agents.len() - minority,
            minority,
        }
    }
}

/// Fill an empty grid at random, returning agents indexed by id
pub fn spawn_population<R: Rng + ?Sized>(
    grid: &mut Grid,
    density: f64,
    minority_pc: f64,
    rng: &mut R,
) -> Result<Vec<Agent>, GridError> {
    let mut agents = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if rng.gen::<f64>() >= density {
                continue;
            }
            let kind = if rng.gen::<f64>() < minority_pc {
                AgentKind::Minority
            } else {
                AgentKind::Majority
            };
            let position = Position::new(x, y);
            let id = AgentId(agents.len() as u32);
            grid.place(position, Occupant { id, kind })?;
            agents.push(Agent::new(id, kind, position));
        }
    }

    Ok(agents)
}

/// Place a fixed layout, ids assigned in the order given
pub fn place_population(
    grid: &mut Grid,
    layout: &[(Position, AgentKind)],
) -> Result<Vec<Agent>, GridError> {
    layout
        .iter()
        .enumerate()
        .map(|(i, &(position, kind))| {
            let id = AgentId(i as u32);
            grid.place(position, Occupant { id, kind })?;
            Ok(Agent::new(id, kind, position))
        })
        .collect()
}
