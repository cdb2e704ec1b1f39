#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static battlefield state for the Skirmish simulation.
//!
//! The world crate owns everything that is a pure function of the board:
//! the [`TerrainGrid`] with its passability, vision and line-of-sight
//! queries, per-observer [`VisibilityMask`] values, and the per-team
//! [`DangerField`]. A [`Battlefield`] bundles a generated board with the
//! depot locations and initial deployments consumed once at setup.

mod danger;
mod terrain;
mod visibility;

use skirmish_core::{CellCoord, Role, Team};

pub use danger::{DangerField, MAX_DANGER};
pub use terrain::{TerrainError, TerrainGrid};
pub use visibility::VisibilityMask;

/// Supply depots belonging to a single team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TeamDepots {
    /// Cell where providers collect ammunition.
    pub ammo: CellCoord,
    /// Cell where medics collect medical supplies.
    pub medical: CellCoord,
}

/// Initial placement of a single agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Deployment {
    /// Team the agent fights for.
    pub team: Team,
    /// Role the agent plays for the whole run.
    pub role: Role,
    /// Spawn cell.
    pub cell: CellCoord,
}

/// Everything the simulation needs from the terrain generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Battlefield {
    /// Populated terrain grid.
    pub terrain: TerrainGrid,
    /// Depots indexed by [`Team::index`].
    pub depots: [TeamDepots; 2],
    /// Agents to create, in roster order.
    pub deployments: Vec<Deployment>,
}

impl Battlefield {
    /// Depots owned by `team`.
    #[must_use]
    pub fn depots(&self, team: Team) -> TeamDepots {
        self.depots[team.index()]
    }
}
