//! Happiness history
//!
//! Per-step records of the satisfied-agent count, the series a chart
//! renderer plots.

use serde::{Deserialize, Serialize};

/// Outcome of one executed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number, 0 for the initial state
    pub step: u64,
    pub satisfied: u32,
    /// Agents that moved to a new cell this step
    pub relocated: u32,
    /// Dissatisfied agents that found no empty cell
    pub unresolved: u32,
    pub total_agents: u32,
}

impl StepRecord {
    pub fn all_satisfied(&self) -> bool {
        self.satisfied == self.total_agents
    }
}

/// Satisfied counts collected after initialization and after every step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HappyHistory {
    pub records: Vec<StepRecord>,
}

impl HappyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// The plain `happy` series
    pub fn satisfied_series(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.satisfied).collect()
    }

    pub fn peak_satisfied(&self) -> u32 {
        self.records.iter().map(|r| r.satisfied).max().unwrap_or(0)
    }
}
