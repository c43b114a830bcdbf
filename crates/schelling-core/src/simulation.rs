//! The Schelling model
//!
//! [`Simulation`] owns the grid, the population, the random source and the
//! happiness tally. Construction validates the configuration, computes the
//! city centers and spawns the population; each [`Simulation::step`] then
//! visits every agent once in a fresh random order until every agent is
//! satisfied.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use schelling_events::{HappyHistory, StepRecord};

use crate::components::agent::{Agent, AgentId, AgentKind};
use crate::components::city::CityCenters;
use crate::components::grid::{Grid, GridError, Position};
use crate::config::{ConfigError, ModelConfig};
use crate::setup::{place_population, spawn_population, SpawnSummary};
use crate::systems::satisfaction::{Evaluation, SatisfactionRule};
use crate::systems::schedule::activation_order;
use crate::SimRng;

/// Errors raised while building a simulation
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Lifecycle phase. Initialization happens inside the constructors, so a
/// live simulation is always in one of these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Every agent was satisfied after the last step; terminal
    Converged,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: ModelConfig,
    grid: Grid,
    agents: Vec<Agent>,
    rule: SatisfactionRule,
    rng: SimRng,
    satisfied: u32,
    steps: u64,
    phase: Phase,
    history: HappyHistory,
}

impl Simulation {
    /// Build and populate a model, seeding from `config.seed` when set
    pub fn new(config: ModelConfig) -> Result<Self, SimError> {
        let rng = SimRng::from_seed_option(config.seed);
        Self::with_rng(config, rng)
    }

    /// Build and populate a model drawing from the given random source
    pub fn with_rng(config: ModelConfig, mut rng: SimRng) -> Result<Self, SimError> {
        config.validate()?;
        let mut grid = Grid::new(config.width, config.height)?;
        let agents = spawn_population(&mut grid, config.density, config.minority_pc, &mut rng.0)?;
        Ok(Self::assemble(config, grid, agents, rng))
    }

    /// Build a model around a fixed layout instead of a random population.
    ///
    /// `density` and `minority_pc` are still validated but not used.
    pub fn from_layout(
        config: ModelConfig,
        layout: &[(Position, AgentKind)],
        rng: SimRng,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let mut grid = Grid::new(config.width, config.height)?;
        let agents = place_population(&mut grid, layout)?;
        Ok(Self::assemble(config, grid, agents, rng))
    }

    fn assemble(config: ModelConfig, grid: Grid, agents: Vec<Agent>, rng: SimRng) -> Self {
        let city_centers = CityCenters::compute(config.width, config.height, config.city_distance);
        let rule = SatisfactionRule {
            homophily: config.homophily,
            radius: config.radius,
            distance: config.distance,
            city_centers,
        };

        let summary = SpawnSummary::from_agents(&agents);
        let [first, second] = city_centers.positions();
        info!(
            "Initialized {}x{} grid: {} agents ({} majority, {} minority), city centers {} and {}",
            config.width,
            config.height,
            summary.total_agents,
            summary.majority,
            summary.minority,
            first,
            second
        );

        let mut sim = Self {
            config,
            grid,
            agents,
            rule,
            rng,
            satisfied: 0,
            steps: 0,
            phase: Phase::Running,
            history: HappyHistory::new(),
        };
        // No agent has been evaluated yet; the first entry records zero
        sim.history.push(sim.record(0, 0));
        sim
    }

    fn record(&self, relocated: u32, unresolved: u32) -> StepRecord {
        StepRecord {
            step: self.steps,
            satisfied: self.satisfied,
            relocated,
            unresolved,
            total_agents: self.agent_count() as u32,
        }
    }

    /// Advance one generation.
    ///
    /// Returns None without touching any state once the model has converged.
    pub fn step(&mut self) -> Option<StepRecord> {
        if self.phase == Phase::Converged {
            return None;
        }

        self.satisfied = 0;
        let mut relocated = 0u32;
        let mut unresolved = 0u32;

        for id in activation_order(self.agents.len(), &mut self.rng.0) {
            if self.evaluate(id).satisfied {
                self.satisfied += 1;
            } else if self.relocate(id) {
                relocated += 1;
            } else {
                unresolved += 1;
            }
        }

        self.steps += 1;
        let record = self.record(relocated, unresolved);
        self.history.push(record);

        if unresolved > 0 {
            warn!(
                "Step {}: {} dissatisfied agents found no empty cell",
                self.steps, unresolved
            );
        }
        debug!(
            "Step {}: {} / {} satisfied, {} relocated",
            self.steps,
            self.satisfied,
            self.agents.len(),
            relocated
        );

        if self.satisfied as usize == self.agents.len() {
            self.phase = Phase::Converged;
            info!("Converged after {} steps", self.steps);
        }

        Some(record)
    }

    /// Run until converged or `max_steps` more steps have executed
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let mut executed = 0;
        while executed < max_steps && self.step().is_some() {
            executed += 1;
        }
        executed
    }

    /// Judge one agent against the current grid
    pub fn evaluate(&self, id: AgentId) -> Evaluation {
        self.agents[id.index()].evaluate(&self.grid, &self.rule)
    }

    /// Move an agent to a random empty cell. The grid and the agent are both
    /// updated before this returns; false when no empty cell exists.
    fn relocate(&mut self, id: AgentId) -> bool {
        let agent = &mut self.agents[id.index()];
        let from = agent.position();
        match self.grid.move_to_empty(from, &mut self.rng.0) {
            Some(to) => {
                agent.set_position(to);
                trace!("{} moved {} -> {}", id, from, to);
                true
            }
            None => false,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn rule(&self) -> &SatisfactionRule {
        &self.rule
    }

    pub fn city_centers(&self) -> CityCenters {
        self.rule.city_centers
    }

    /// Satisfied agents counted during the last step
    pub fn satisfied_count(&self) -> u32 {
        self.satisfied
    }

    /// Steps executed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn history(&self) -> &HappyHistory {
        &self.history
    }

    pub fn spawn_summary(&self) -> SpawnSummary {
        SpawnSummary::from_agents(&self.agents)
    }

    /// Reporter line shown under the grid
    pub fn happy_report(&self) -> String {
        format!("Happy agents: {}", self.satisfied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ModelConfig {
        ModelConfig::new(10, 10, 0.7, 0.3, 1.5, 1, 2).with_seed(42)
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = ModelConfig { radius: 0, ..small_config() };
        let err = Simulation::new(config).unwrap_err();
        assert!(matches!(err, SimError::Config(ConfigError::InvalidParameter { name: "radius", .. })));
    }

    #[test]
    fn test_initial_state() {
        let sim = Simulation::new(small_config()).unwrap();
        assert!(sim.running());
        assert_eq!(sim.steps(), 0);
        assert_eq!(sim.satisfied_count(), 0);
        assert_eq!(sim.history().satisfied_series(), vec![0]);
        assert_eq!(sim.grid().occupied_count(), sim.agent_count());
        assert_eq!(sim.happy_report(), "Happy agents: 0");
    }

    #[test]
    fn test_step_records_history() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let record = sim.step().unwrap();

        assert_eq!(record.step, 1);
        assert_eq!(record.total_agents as usize, sim.agent_count());
        assert_eq!(record.satisfied, sim.satisfied_count());
        assert_eq!(
            record.satisfied + record.relocated + record.unresolved,
            record.total_agents
        );
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Simulation::new(small_config()).unwrap();
        let mut b = Simulation::new(small_config()).unwrap();
        a.run(5);
        b.run(5);

        assert_eq!(a.agents(), b.agents());
        assert_eq!(a.history().satisfied_series(), b.history().satisfied_series());
    }

    #[test]
    fn test_empty_grid_converges_on_first_step() {
        let config = ModelConfig { density: 0.0, ..small_config() };
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.agent_count(), 0);

        let record = sim.step().unwrap();
        assert_eq!(record.satisfied, 0);
        assert_eq!(sim.phase(), Phase::Converged);
        assert!(sim.step().is_none());
    }

    #[test]
    fn test_converged_steps_are_noops() {
        // Two isolated agents are satisfied immediately
        let layout = [
            (Position::new(0, 0), AgentKind::Majority),
            (Position::new(5, 5), AgentKind::Minority),
        ];
        let mut sim =
            Simulation::from_layout(small_config(), &layout, SimRng::seed_from_u64(1)).unwrap();

        assert_eq!(sim.step().map(|r| r.satisfied), Some(2));
        assert!(!sim.running());

        let before = sim.agents().to_vec();
        assert!(sim.step().is_none());
        assert_eq!(sim.steps(), 1);
        assert_eq!(sim.agents(), &before[..]);
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn test_dissatisfied_agent_relocates() {
        // Far from both centers, one majority flanked by two minorities
        let config = ModelConfig::new(9, 9, 0.5, 0.5, 1.5, 1, 0).with_city_distance(1000.0);
        let layout = [
            (Position::new(4, 4), AgentKind::Majority),
            (Position::new(3, 4), AgentKind::Minority),
            (Position::new(5, 4), AgentKind::Minority),
        ];
        let sim = Simulation::from_layout(config, &layout, SimRng::seed_from_u64(3)).unwrap();
        assert!(!sim.evaluate(AgentId(0)).satisfied);

        let mut sim = sim;
        let record = sim.step().unwrap();
        assert!(record.relocated >= 1);
        assert_eq!(sim.grid().occupied_count(), 3);
        for agent in sim.agents() {
            assert_eq!(sim.grid().get(agent.position()).map(|o| o.id), Some(agent.id()));
        }
    }

    #[test]
    fn test_run_stops_at_convergence() {
        let layout = [(Position::new(2, 2), AgentKind::Majority)];
        let mut sim =
            Simulation::from_layout(small_config(), &layout, SimRng::seed_from_u64(1)).unwrap();
        assert_eq!(sim.run(50), 1);
        assert_eq!(sim.run(50), 0);
    }
}
