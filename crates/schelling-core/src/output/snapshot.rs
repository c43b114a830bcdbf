//! Snapshot Generation
//!
//! Converts live simulation state into [`GridSnapshot`]s and writes them to
//! disk for offline viewers.

use std::fs;
use std::path::Path;

use schelling_events::{generate_snapshot_id, CellSnapshot, GridSnapshot, HappyHistory, PointSnapshot};

use crate::components::grid::Position;
use crate::output::stats::segregation_index;
use crate::simulation::Simulation;

/// Tracks snapshot numbering and cadence
#[derive(Debug)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
    last_snapshot_step: Option<u64>,
}

impl SnapshotGenerator {
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
            last_snapshot_step: None,
        }
    }

    /// Step 0 always snapshots; after that every `snapshot_interval` steps
    pub fn should_snapshot(&self, step: u64) -> bool {
        step == 0 || (self.snapshot_interval > 0 && step % self.snapshot_interval == 0)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn mark_snapshot(&mut self, step: u64) {
        self.last_snapshot_step = Some(step);
    }

    pub fn last_snapshot_step(&self) -> Option<u64> {
        self.last_snapshot_step
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

fn point(pos: Position) -> PointSnapshot {
    PointSnapshot { x: pos.x, y: pos.y }
}

/// Capture the grid as it stands after the last step
pub fn generate_snapshot(sim: &Simulation, snapshot_id: &str) -> GridSnapshot {
    let centers = sim.city_centers();
    let grid = sim.grid();

    let cells = grid
        .iter_cells()
        .map(|(pos, occupant)| match occupant {
            Some(occupant) => CellSnapshot::Agent {
                id: occupant.id.0,
                kind: occupant.kind,
                satisfied: Some(sim.evaluate(occupant.id).satisfied),
            },
            None if centers.contains(pos) => CellSnapshot::CityCenter,
            None => CellSnapshot::Empty,
        })
        .collect();

    let [first, second] = centers.positions();
    GridSnapshot {
        snapshot_id: snapshot_id.to_string(),
        step: sim.steps(),
        width: grid.width(),
        height: grid.height(),
        cells,
        city_centers: [point(first), point(second)],
        satisfied: sim.satisfied_count(),
        total_agents: sim.agent_count() as u32,
        running: sim.running(),
        segregation_index: segregation_index(sim),
    }
}

/// Write snapshot to file
pub fn write_snapshot(snapshot: &GridSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write snapshot to `<dir>/snapshots/snap_<step>.json`
pub fn write_snapshot_to_dir(snapshot: &GridSnapshot, dir: impl AsRef<Path>) -> std::io::Result<()> {
    let snapshots = dir.as_ref().join("snapshots");
    fs::create_dir_all(&snapshots)?;
    write_snapshot(snapshot, snapshots.join(format!("snap_{:06}.json", snapshot.step)))
}

/// Write current state (overwrites each time)
pub fn write_current_state(snapshot: &GridSnapshot, dir: impl AsRef<Path>) -> std::io::Result<()> {
    fs::create_dir_all(dir.as_ref())?;
    write_snapshot(snapshot, dir.as_ref().join("current_state.json"))
}

/// Write the happy-count series collected so far
pub fn write_history(history: &HappyHistory, dir: impl AsRef<Path>) -> std::io::Result<()> {
    fs::create_dir_all(dir.as_ref())?;
    let json = serde_json::to_string_pretty(history)?;
    fs::write(dir.as_ref().join("history.json"), json)
}
