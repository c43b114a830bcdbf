//! Grid Components
//!
//! A bounded (non-toroidal) lattice holding at most one agent per cell.
//!
//! Cells live in a flat row-major vector. The grid also keeps a list of empty
//! cells so relocation can pick a uniformly random destination in O(1): the
//! chosen slot is handed the agent's old cell, so the list stays exact without
//! any rescans.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::agent::{AgentId, AgentKind};

/// A cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// |dx| + |dy|
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// max(|dx|, |dy|), the Moore-neighborhood distance
    pub fn chebyshev(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What a cell holds when it is occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub id: AgentId,
    pub kind: AgentKind,
}

/// Grid errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    ZeroSized { width: u32, height: u32 },
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },
    #[error("cell {position} is already occupied by {occupant}")]
    Occupied { position: Position, occupant: AgentId },
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<Occupant>>,
    /// Every empty cell, in no particular order
    empties: Vec<Position>,
    /// For each cell, its slot in `empties` while it is empty
    empty_slots: Vec<Option<usize>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSized { width, height });
        }

        let len = width as usize * height as usize;
        let mut empties = Vec::with_capacity(len);
        let mut empty_slots = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                empty_slots.push(Some(empties.len()));
                empties.push(Position::new(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            cells: vec![None; len],
            empties,
            empty_slots,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Occupant of a cell; None when empty or out of bounds
    pub fn get(&self, pos: Position) -> Option<Occupant> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.cells[i].is_none())
    }

    pub fn empty_count(&self) -> usize {
        self.empties.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.len() - self.empties.len()
    }

    /// Put an agent into an empty cell
    pub fn place(&mut self, pos: Position, occupant: Occupant) -> Result<(), GridError> {
        let index = self.index(pos).ok_or(GridError::OutOfBounds {
            position: pos,
            width: self.width,
            height: self.height,
        })?;
        if let Some(existing) = self.cells[index] {
            return Err(GridError::Occupied {
                position: pos,
                occupant: existing.id,
            });
        }

        self.take_empty_slot(index);
        self.cells[index] = Some(occupant);
        Ok(())
    }

    /// Remove `index` from the empty list, patching the slot of whichever
    /// cell gets swapped into its place.
    fn take_empty_slot(&mut self, index: usize) {
        if let Some(slot) = self.empty_slots[index].take() {
            self.empties.swap_remove(slot);
            if let Some(&moved) = self.empties.get(slot) {
                if let Some(moved_index) = self.index(moved) {
                    self.empty_slots[moved_index] = Some(slot);
                }
            }
        }
    }

    /// Occupied cells within Chebyshev distance `radius` of `pos`, excluding
    /// `pos` itself, in row-major order. Cells past the edges do not exist.
    pub fn neighbors(
        &self,
        pos: Position,
        radius: u32,
    ) -> impl Iterator<Item = (Position, Occupant)> + '_ {
        let x_min = pos.x.saturating_sub(radius);
        let x_max = pos.x.saturating_add(radius).min(self.width - 1);
        let y_min = pos.y.saturating_sub(radius);
        let y_max = pos.y.saturating_add(radius).min(self.height - 1);

        (y_min..=y_max)
            .flat_map(move |y| (x_min..=x_max).map(move |x| Position::new(x, y)))
            .filter(move |&p| p != pos)
            .filter_map(move |p| self.get(p).map(|occupant| (p, occupant)))
    }

    /// Move the occupant of `from` to a uniformly chosen empty cell.
    ///
    /// Returns the destination, or None when `from` is empty or the grid has
    /// no empty cell. The move is complete when this returns: the old cell is
    /// empty and the new one occupied.
    pub fn move_to_empty<R: Rng + ?Sized>(&mut self, from: Position, rng: &mut R) -> Option<Position> {
        let from_index = self.index(from)?;
        let occupant = self.cells[from_index]?;
        if self.empties.is_empty() {
            return None;
        }

        let slot = rng.gen_range(0..self.empties.len());
        let to = self.empties[slot];
        let to_index = self.index(to)?;

        // The vacated cell takes over the destination's slot
        self.empties[slot] = from;
        self.empty_slots[from_index] = Some(slot);
        self.empty_slots[to_index] = None;

        self.cells[from_index] = None;
        self.cells[to_index] = Some(occupant);
        Some(to)
    }

    /// All cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (Position, Option<Occupant>)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let i = i as u32;
            (Position::new(i % width, i / width), *cell)
        })
    }
}
