//! Statistics Output
//!
//! Run summaries and a simple clustering measure for reports.

use serde::Serialize;

use crate::simulation::{Phase, Simulation};
use crate::systems::satisfaction::NeighborCounts;

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub steps: u64,
    pub total_agents: usize,
    pub majority_count: usize,
    pub minority_count: usize,
    pub final_satisfied: u32,
    pub peak_satisfied: u32,
    pub converged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segregation_index: Option<f64>,
}

impl StatsSummary {
    pub fn collect(sim: &Simulation) -> Self {
        let spawn = sim.spawn_summary();
        Self {
            steps: sim.steps(),
            total_agents: spawn.total_agents,
            majority_count: spawn.majority,
            minority_count: spawn.minority,
            final_satisfied: sim.satisfied_count(),
            peak_satisfied: sim.history().peak_satisfied(),
            converged: sim.phase() == Phase::Converged,
            segregation_index: segregation_index(sim),
        }
    }

    /// Share of agents satisfied after the last step
    pub fn satisfied_share(&self) -> f64 {
        if self.total_agents == 0 {
            1.0
        } else {
            f64::from(self.final_satisfied) / self.total_agents as f64
        }
    }
}

/// Mean share of same-kind neighbors, over agents with at least one neighbor.
///
/// None when no agent has a neighbor.
pub fn segregation_index(sim: &Simulation) -> Option<f64> {
    let radius = sim.rule().radius;
    let (sum, counted) = sim
        .agents()
        .iter()
        .map(|agent| NeighborCounts::tally(sim.grid(), agent.position(), agent.kind(), radius))
        .filter(|counts| counts.total() > 0)
        .fold((0.0, 0usize), |(sum, counted), counts| {
            (sum + f64::from(counts.similar) / f64::from(counts.total()), counted + 1)
        });

    (counted > 0).then(|| sum / counted as f64)
}
