//! Integration tests for the simulation engine.
//!
//! These drive full simulations through the public API and check the
//! occupancy, bounds, convergence and decision-rule properties after every
//! step.

use std::collections::HashSet;

use schelling_core::output::{generate_snapshot, StatsSummary};
use schelling_core::{
    AgentId, AgentKind, CityCenters, Config, ModelConfig, Position, SimRng, Simulation,
};

/// Check every structural invariant of a live simulation.
fn assert_invariants(sim: &Simulation, expected_agents: usize) {
    let grid = sim.grid();
    assert_eq!(sim.agent_count(), expected_agents, "population changed");
    assert_eq!(grid.occupied_count(), expected_agents, "grid occupancy drifted");

    let mut seen = HashSet::new();
    for agent in sim.agents() {
        let pos = agent.position();
        assert!(pos.x < grid.width() && pos.y < grid.height(), "{} out of bounds", pos);
        assert!(seen.insert(pos), "two agents share {}", pos);
        let occupant = grid.get(pos).expect("agent cell is empty");
        assert_eq!(occupant.id, agent.id());
        assert_eq!(occupant.kind, agent.kind());
    }

    assert!(sim.satisfied_count() as usize <= expected_agents);
}

#[test]
fn test_invariants_hold_across_many_steps() {
    let config = ModelConfig::new(20, 20, 0.8, 0.2, 1.5, 1, 2).with_seed(2024);
    let mut sim = Simulation::new(config).unwrap();
    let population = sim.agent_count();
    assert!(population > 0);

    for _ in 0..50 {
        if sim.step().is_none() {
            break;
        }
        assert_invariants(&sim, population);
    }
}

#[test]
fn test_four_by_four_full_density_scenario() {
    let config = ModelConfig::new(4, 4, 1.0, 0.5, 1.0, 1, 0).with_seed(7);
    let mut sim = Simulation::new(config).unwrap();
    assert_eq!(sim.agent_count(), 16);
    assert_eq!(sim.grid().empty_count(), 0);

    let record = sim.step().expect("first step runs");
    assert_eq!(record.total_agents, 16);
    assert!(record.satisfied <= 16);
    // No empty cell exists, so nobody can have moved
    assert_eq!(record.relocated, 0);
    assert_eq!(record.satisfied + record.unresolved, 16);
    assert_invariants(&sim, 16);
}

#[test]
fn test_full_density_never_corrupts_grid() {
    // Checkerboard: every agent has more unlike than like neighbors
    let config = ModelConfig::new(6, 6, 1.0, 0.5, 3.0, 1, 0).with_city_distance(1000.0);
    let mut layout = Vec::new();
    for y in 0..6 {
        for x in 0..6 {
            let kind = if (x + y) % 2 == 0 { AgentKind::Majority } else { AgentKind::Minority };
            layout.push((Position::new(x, y), kind));
        }
    }
    let before: Vec<Position> = layout.iter().map(|(p, _)| *p).collect();
    let mut sim = Simulation::from_layout(config, &layout, SimRng::seed_from_u64(5)).unwrap();

    for _ in 0..5 {
        let record = sim.step().expect("never converges");
        assert_eq!(record.relocated, 0);
        assert!(record.unresolved > 0);
        assert_invariants(&sim, 36);
    }

    let after: Vec<Position> = sim.agents().iter().map(|a| a.position()).collect();
    assert_eq!(before, after);
    assert!(sim.running());
}

#[test]
fn test_convergence_flag_is_monotonic() {
    let config = ModelConfig::new(12, 12, 0.5, 0.3, 1.0, 1, 2).with_seed(99);
    let mut sim = Simulation::new(config).unwrap();

    let mut was_running = sim.running();
    for _ in 0..500 {
        sim.step();
        let running = sim.running();
        assert!(was_running || !running, "running flipped back to true");
        was_running = running;
    }
}

#[test]
fn test_converged_means_everyone_satisfied() {
    let config = ModelConfig::new(10, 10, 0.3, 0.5, 1.0, 1, 2).with_seed(11);
    let mut sim = Simulation::new(config).unwrap();
    sim.run(1000);

    if !sim.running() {
        assert_eq!(sim.satisfied_count() as usize, sim.agent_count());
        for agent in sim.agents() {
            assert!(sim.evaluate(agent.id()).satisfied, "{} unsatisfied", agent.id());
        }
        let steps = sim.steps();
        assert!(sim.step().is_none());
        assert_eq!(sim.steps(), steps);
    }
}

#[test]
fn test_near_city_rule_is_more_tolerant() {
    // Centers at (0, 0) and (9, 9); near means within 3 steps
    let config = ModelConfig::new(10, 10, 0.5, 0.5, 1.5, 1, 3).with_city_distance(1000.0);
    assert_eq!(
        CityCenters::compute(10, 10, Some(1000.0)).positions(),
        [Position::new(0, 0), Position::new(9, 9)]
    );

    let near = [
        (Position::new(1, 1), AgentKind::Majority),
        (Position::new(0, 1), AgentKind::Majority),
        (Position::new(2, 1), AgentKind::Minority),
    ];
    let sim = Simulation::from_layout(config.clone(), &near, SimRng::seed_from_u64(1)).unwrap();
    let evaluation = sim.evaluate(AgentId(0));
    assert!(evaluation.near_city);
    assert_eq!((evaluation.counts.similar, evaluation.counts.unsimilar), (1, 1));
    assert!(evaluation.satisfied);

    let far = [
        (Position::new(5, 4), AgentKind::Majority),
        (Position::new(4, 4), AgentKind::Majority),
        (Position::new(6, 4), AgentKind::Minority),
    ];
    let sim = Simulation::from_layout(config, &far, SimRng::seed_from_u64(1)).unwrap();
    let evaluation = sim.evaluate(AgentId(0));
    assert!(!evaluation.near_city);
    assert_eq!((evaluation.counts.similar, evaluation.counts.unsimilar), (1, 1));
    assert!(!evaluation.satisfied);
}

#[test]
fn test_isolated_agents_are_always_satisfied() {
    let config = ModelConfig::new(9, 9, 0.5, 0.5, 3.0, 2, 0).with_city_distance(1000.0);
    let layout = [
        (Position::new(0, 0), AgentKind::Majority),
        (Position::new(4, 4), AgentKind::Minority),
        (Position::new(8, 8), AgentKind::Majority),
    ];
    let mut sim = Simulation::from_layout(config, &layout, SimRng::seed_from_u64(1)).unwrap();

    let record = sim.step().unwrap();
    assert_eq!(record.satisfied, 3);
    assert!(!sim.running());
}

#[test]
fn test_seed_reproduces_full_run() {
    let config = ModelConfig::new(15, 15, 0.7, 0.4, 1.5, 1, 2).with_seed(31337);
    let mut a = Simulation::new(config.clone()).unwrap();
    let mut b = Simulation::new(config).unwrap();
    a.run(25);
    b.run(25);

    assert_eq!(a.history().satisfied_series(), b.history().satisfied_series());
    assert_eq!(a.agents(), b.agents());
}

#[test]
fn test_history_tracks_every_step() {
    let config = ModelConfig::new(10, 10, 0.8, 0.5, 1.5, 1, 1).with_seed(3);
    let mut sim = Simulation::new(config).unwrap();
    let executed = sim.run(8);

    let history = sim.history();
    assert_eq!(history.len() as u64, executed + 1);
    assert_eq!(history.records[0].satisfied, 0);
    for (i, record) in history.records.iter().enumerate() {
        assert_eq!(record.step, i as u64);
        assert!(record.satisfied <= record.total_agents);
    }
}

#[test]
fn test_snapshot_matches_live_state() {
    let config = Config::from_str(
        r#"
        [model]
        width = 8
        height = 5
        density = 0.6
        seed = 17
        "#,
    )
    .unwrap();
    let mut sim = Simulation::new(config.model).unwrap();
    sim.step();

    let snapshot = generate_snapshot(&sim, "snap_000001");
    assert_eq!(snapshot.cells.len(), 40);
    assert_eq!(snapshot.step, 1);
    assert_eq!(snapshot.satisfied, sim.satisfied_count());
    assert_eq!(
        snapshot.count_kind(AgentKind::Majority) + snapshot.count_kind(AgentKind::Minority),
        sim.agent_count()
    );
    assert_eq!(snapshot.render_ascii().lines().count(), 5);

    let summary = StatsSummary::collect(&sim);
    assert_eq!(summary.total_agents, sim.agent_count());
    assert_eq!(summary.steps, 1);
}

#[test]
fn test_config_file_drives_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schelling.toml");
    std::fs::write(
        &path,
        "[model]\nwidth = 6\nheight = 6\nradius = 0\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    let err = Simulation::new(config.model).unwrap_err();
    assert!(err.to_string().contains("radius"), "{}", err);
}
