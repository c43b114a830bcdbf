//! Agent Components
//!
//! An agent is a kind and a position. Ids and kinds never change; only the
//! position does, and only through [`crate::Simulation`].

use serde::{Deserialize, Serialize};

use crate::components::grid::{Grid, Position};
use crate::systems::satisfaction::{Evaluation, SatisfactionRule};

pub use schelling_events::AgentKind;

/// Unique agent identifier, also the agent's index in the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent_{:04}", self.0)
    }
}

/// A resident of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    kind: AgentKind,
    position: Position,
}

impl Agent {
    pub fn new(id: AgentId, kind: AgentKind, position: Position) -> Self {
        Self { id, kind, position }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn is_minority(&self) -> bool {
        self.kind == AgentKind::Minority
    }

    /// Judge the agent's current cell against the live grid
    pub fn evaluate(&self, grid: &Grid, rule: &SatisfactionRule) -> Evaluation {
        rule.evaluate(grid, self.position, self.kind)
    }
}
