//! Snapshot Types
//!
//! Serialization structs for grid snapshots.
//!
//! A snapshot captures everything a renderer needs to draw one frame: the
//! contents of every cell, the two city centers and the happiness tally.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// The two agent populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Majority,
    Minority,
}

impl AgentKind {
    /// Single-character glyph used by text renderers
    pub fn glyph(self) -> char {
        match self {
            AgentKind::Majority => 'o',
            AgentKind::Minority => 'x',
        }
    }
}

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub x: u32,
    pub y: u32,
}

/// Contents of one cell, already layered for drawing.
///
/// Agents are drawn above city-center markers, which are drawn above empty
/// ground, so an occupied city center reports the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellSnapshot {
    Empty,
    CityCenter,
    Agent {
        id: u32,
        kind: AgentKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        satisfied: Option<bool>,
    },
}

impl CellSnapshot {
    pub fn glyph(&self) -> char {
        match self {
            CellSnapshot::Empty => '.',
            CellSnapshot::CityCenter => '#',
            CellSnapshot::Agent { kind, .. } => kind.glyph(),
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, CellSnapshot::Agent { .. })
    }
}

/// Complete grid state at the end of a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub snapshot_id: String,
    pub step: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major cell contents, `width * height` entries
    pub cells: Vec<CellSnapshot>,
    pub city_centers: [PointSnapshot; 2],
    pub satisfied: u32,
    pub total_agents: u32,
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segregation_index: Option<f64>,
}

impl GridSnapshot {
    /// Cell at (x, y), or None outside the grid
    pub fn cell(&self, x: u32, y: u32) -> Option<&CellSnapshot> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y as usize) * (self.width as usize) + x as usize)
    }

    /// Number of cells holding an agent of the given kind
    pub fn count_kind(&self, kind: AgentKind) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, CellSnapshot::Agent { kind: k, .. } if *k == kind))
            .count()
    }

    /// Renders the grid as text, one line per row, top row first
    pub fn render_ascii(&self) -> String {
        let width = self.width as usize;
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.cells.chunks(width.max(1)) {
            out.extend(row.iter().map(CellSnapshot::glyph));
            out.push('\n');
        }
        out
    }
}
