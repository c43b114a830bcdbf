//! Satisfaction Rule
//!
//! An agent is satisfied when it has no unlike neighbors, or when the ratio of
//! like to unlike neighbors reaches the required ratio. Far from both city
//! centers the required ratio is the homophily parameter; within `distance`
//! of a center it is [`NEAR_CITY_RATIO`].

use serde::{Deserialize, Serialize};

use crate::components::agent::AgentKind;
use crate::components::city::CityCenters;
use crate::components::grid::{Grid, Position};

/// Required similar-to-unsimilar ratio within `distance` of a city center.
///
/// Kept separate from homophily: with homophily below 1.0 the city centers
/// end up less tolerant than the periphery.
pub const NEAR_CITY_RATIO: f64 = 1.0;

/// Like and unlike neighbors around one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborCounts {
    pub similar: u32,
    pub unsimilar: u32,
}

impl NeighborCounts {
    /// Count the Moore neighborhood of `pos` relative to `kind`
    pub fn tally(grid: &Grid, pos: Position, kind: AgentKind, radius: u32) -> Self {
        grid.neighbors(pos, radius)
            .fold(Self::default(), |mut counts, (_, occupant)| {
                if occupant.kind == kind {
                    counts.similar += 1;
                } else {
                    counts.unsimilar += 1;
                }
                counts
            })
    }

    pub fn total(&self) -> u32 {
        self.similar + self.unsimilar
    }

    /// True with no unlike neighbors; otherwise similar / unsimilar >= required
    pub fn meets(&self, required_ratio: f64) -> bool {
        self.unsimilar == 0 || f64::from(self.similar) / f64::from(self.unsimilar) >= required_ratio
    }
}

/// Outcome of judging one agent's cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub distance_to_city: u32,
    /// Within `distance` of a city center
    pub near_city: bool,
    pub counts: NeighborCounts,
    pub required_ratio: f64,
    pub satisfied: bool,
}

/// Parameters of the relocation policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionRule {
    pub homophily: f64,
    pub radius: u32,
    /// Manhattan distance at or below which a cell counts as near a city
    pub distance: u32,
    pub city_centers: CityCenters,
}

impl SatisfactionRule {
    /// Ratio an agent at `distance_to_city` must reach
    pub fn required_ratio(&self, distance_to_city: u32) -> f64 {
        if self.is_near_city(distance_to_city) {
            NEAR_CITY_RATIO
        } else {
            self.homophily
        }
    }

    pub fn is_near_city(&self, distance_to_city: u32) -> bool {
        distance_to_city <= self.distance
    }

    /// Judge an agent of `kind` standing at `pos` against the live grid
    pub fn evaluate(&self, grid: &Grid, pos: Position, kind: AgentKind) -> Evaluation {
        let distance_to_city = self.city_centers.distance_to_nearest(pos);
        let counts = NeighborCounts::tally(grid, pos, kind, self.radius);
        let required_ratio = self.required_ratio(distance_to_city);

        Evaluation {
            distance_to_city,
            near_city: self.is_near_city(distance_to_city),
            counts,
            required_ratio,
            satisfied: counts.meets(required_ratio),
        }
    }
}
