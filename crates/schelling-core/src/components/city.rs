//! City Centers
//!
//! Two fixed points placed symmetrically about the grid center along the
//! main diagonal. Agents close to either one apply a more tolerant rule.

use serde::{Deserialize, Serialize};

use crate::components::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCenters([Position; 2]);

impl CityCenters {
    pub fn new(first: Position, second: Position) -> Self {
        Self([first, second])
    }

    /// Half the grid diagonal
    pub fn default_distance(width: u32, height: u32) -> f64 {
        (f64::from(width).powi(2) + f64::from(height).powi(2)).sqrt() / 2.0
    }

    /// Place both centers `city_distance / sqrt(2)` along each axis from the
    /// grid midpoint, truncated toward zero and clamped into the grid.
    ///
    /// `city_distance` defaults to [`CityCenters::default_distance`].
    pub fn compute(width: u32, height: u32, city_distance: Option<f64>) -> Self {
        let city_distance =
            city_distance.unwrap_or_else(|| Self::default_distance(width, height));
        let offset = city_distance / std::f64::consts::SQRT_2;

        let axis = |extent: u32, shift: f64| -> u32 {
            let raw = (f64::from(extent) / 2.0 + shift).trunc();
            let max = f64::from(extent.saturating_sub(1));
            // `as` saturates NaN to 0, matching the lower clamp
            raw.clamp(0.0, max) as u32
        };

        Self([
            Position::new(axis(width, -offset), axis(height, -offset)),
            Position::new(axis(width, offset), axis(height, offset)),
        ])
    }

    pub fn positions(&self) -> [Position; 2] {
        self.0
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Manhattan distance from `pos` to the closer center
    pub fn distance_to_nearest(&self, pos: Position) -> u32 {
        pos.manhattan(self.0[0]).min(pos.manhattan(self.0[1]))
    }
}
