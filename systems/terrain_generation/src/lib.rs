#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded battlefield generator.
//!
//! Produces a square board sprinkled with water and rock blobs and scattered
//! trees, places each team's ammunition and medical depots near its home
//! corner, and deploys a medic, a provider, a commander and two warriors per
//! team inside that corner. The same seed always yields the same
//! [`Battlefield`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::{CellCoord, CellKind, Role, Team};
use skirmish_world::{Battlefield, Deployment, TeamDepots, TerrainGrid};
use thiserror::Error;

/// Smallest board the layout rules fit on.
pub const MINIMUM_SIZE: u32 = 20;

/// Roster deployed for each team, in creation order.
pub const ROSTER: [Role; 5] = [
    Role::Medic,
    Role::Provider,
    Role::Commander,
    Role::Warrior,
    Role::Warrior,
];

/// Random placement attempts before falling back to a scan of the box.
const PLACEMENT_ATTEMPTS: u32 = 500;

/// Errors raised while generating a battlefield.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The requested board cannot hold depots and deployment boxes.
    #[error("board size {size} is below the minimum of {minimum}")]
    BoardTooSmall {
        /// Requested size.
        size: u32,
        /// Smallest supported size.
        minimum: u32,
    },
    /// The deployment box had no free cell left for an agent.
    #[error("no free deployment cell for the {team:?} {role:?}")]
    NoFreeCell {
        /// Team being deployed.
        team: Team,
        /// Role that could not be placed.
        role: Role,
    },
}

/// Tuning knobs for the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Cells per side of the board.
    pub size: u32,
    /// Seed feeding the generator's random stream.
    pub seed: u64,
    /// Number of water blobs.
    pub water_blobs: u32,
    /// Number of rock blobs.
    pub rock_blobs: u32,
    /// One tree is planted per this many board cells.
    pub cells_per_tree: u32,
}

impl Config {
    /// Creates a configuration with default feature counts.
    #[must_use]
    pub fn new(size: u32, seed: u64) -> Self {
        Self {
            size,
            seed,
            water_blobs: 7,
            rock_blobs: 7,
            cells_per_tree: 80,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(40, 0)
    }
}

/// Depot layout used by the generator for a board of `size` cells.
#[must_use]
pub fn depot_layout(size: u32) -> [TeamDepots; 2] {
    let far = i32::try_from(size).unwrap_or(i32::MAX);
    [
        TeamDepots {
            ammo: CellCoord::new(6, 6),
            medical: CellCoord::new(6, 9),
        },
        TeamDepots {
            ammo: CellCoord::new(far - 7, far - 7),
            medical: CellCoord::new(far - 7, far - 10),
        },
    ]
}

/// Generates a complete battlefield from `config`.
pub fn generate(config: &Config) -> Result<Battlefield, GenerationError> {
    if config.size < MINIMUM_SIZE {
        return Err(GenerationError::BoardTooSmall {
            size: config.size,
            minimum: MINIMUM_SIZE,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut terrain = TerrainGrid::new(config.size);
    let size = i32::try_from(config.size).unwrap_or(i32::MAX);

    for _ in 0..config.water_blobs {
        scatter_blob(&mut terrain, &mut rng, CellKind::Water);
    }
    for _ in 0..config.rock_blobs {
        scatter_blob(&mut terrain, &mut rng, CellKind::Rock);
    }

    let trees = config.size.pow(2) / config.cells_per_tree.max(1);
    for _ in 0..trees {
        let cell = CellCoord::new(rng.gen_range(6..size - 6), rng.gen_range(6..size - 6));
        if terrain.kind(cell) == Some(CellKind::Empty) {
            terrain.set(cell, CellKind::Tree);
        }
    }

    let depots = depot_layout(config.size);
    for team_depots in &depots {
        clear_ring(&mut terrain, team_depots.ammo, 1);
        clear_ring(&mut terrain, team_depots.medical, 1);
        terrain.set(team_depots.ammo, CellKind::SupplyAmmo);
        terrain.set(team_depots.medical, CellKind::SupplyMed);
    }

    let mut deployments = Vec::with_capacity(ROSTER.len() * Team::ALL.len());
    for team in Team::ALL {
        let (low, high) = deployment_box(team, size);
        for role in ROSTER {
            let cell = pick_free_cell(&terrain, &deployments, &mut rng, low, high)
                .ok_or(GenerationError::NoFreeCell { team, role })?;
            if role == Role::Commander {
                clear_ring(&mut terrain, cell, 2);
            }
            deployments.push(Deployment { team, role, cell });
        }
    }

    Ok(Battlefield {
        terrain,
        depots,
        deployments,
    })
}

/// Inclusive row/column range of a team's deployment box.
fn deployment_box(team: Team, size: i32) -> (i32, i32) {
    match team {
        Team::Orange => (3, size / 3),
        Team::Blue => (size - size / 3, size - 3),
    }
}

/// Random walk of three to five cells seeded inside the board's middle band.
fn scatter_blob(terrain: &mut TerrainGrid, rng: &mut ChaCha8Rng, kind: CellKind) {
    let size = i32::try_from(terrain.size()).unwrap_or(i32::MAX);
    let mut cell = CellCoord::new(rng.gen_range(8..size - 8), rng.gen_range(8..size - 8));
    let length = rng.gen_range(3..=5);
    for _ in 0..length {
        terrain.set(cell, kind);
        let step = cell.cardinal_neighbors()[rng.gen_range(0..4)];
        cell = step.clamped(1, size - 2);
    }
}

/// Turns every impassable cell within `radius` of `center` back into open ground.
fn clear_ring(terrain: &mut TerrainGrid, center: CellCoord, radius: i32) {
    for rows in -radius..=radius {
        for columns in -radius..=radius {
            let cell = center.offset(rows, columns);
            if terrain.kind(cell).is_some_and(|kind| !kind.is_passable()) {
                terrain.set(cell, CellKind::Empty);
            }
        }
    }
}

fn is_free(terrain: &TerrainGrid, taken: &[Deployment], cell: CellCoord) -> bool {
    matches!(terrain.kind(cell), Some(CellKind::Empty | CellKind::Tree))
        && taken.iter().all(|deployment| deployment.cell != cell)
}

fn pick_free_cell(
    terrain: &TerrainGrid,
    taken: &[Deployment],
    rng: &mut ChaCha8Rng,
    low: i32,
    high: i32,
) -> Option<CellCoord> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(rng.gen_range(low..=high), rng.gen_range(low..=high));
        if is_free(terrain, taken, cell) {
            return Some(cell);
        }
    }

    (low..=high)
        .flat_map(|row| (low..=high).map(move |column| CellCoord::new(row, column)))
        .find(|cell| is_free(terrain, taken, *cell))
}
