//! Setup validation errors.

use skirmish_core::{CellCoord, Team};
use thiserror::Error;

/// Reasons a battlefield cannot be turned into a simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// A depot lies outside the board.
    #[error("{team:?} depot at {cell:?} lies off the board")]
    DepotOffBoard {
        /// Team owning the depot.
        team: Team,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A deployment lies outside the board.
    #[error("deployment {index} at {cell:?} lies off the board")]
    DeploymentOffBoard {
        /// Position of the deployment in the roster.
        index: usize,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A deployment sits on rock or water.
    #[error("deployment {index} at {cell:?} is not passable")]
    DeploymentBlocked {
        /// Position of the deployment in the roster.
        index: usize,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A team deploys more than one commander.
    #[error("{team:?} deploys {count} commanders")]
    DuplicateCommander {
        /// Team with too many commanders.
        team: Team,
        /// Number of commanders found.
        count: usize,
    },
}

/// Convenience alias for setup results.
pub type Result<T> = std::result::Result<T, SetupError>;
