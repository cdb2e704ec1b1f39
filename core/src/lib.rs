#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish battle simulation.
//!
//! This crate defines the vocabulary that connects the authoritative
//! simulation, the pure systems it consults, and the adapters that drive it.
//! Cells are addressed by [`CellCoord`], agents by [`AgentId`], and the
//! commander of each [`Team`] steers its units by broadcasting [`Order`]
//! values. Every frame the simulation reports what happened through a batch
//! of [`Event`] values and exposes read-only [`AgentSnapshot`] and
//! [`EffectSnapshot`] views for drawing.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Skirmish.";

/// Upper bound on an agent's health.
pub const MAX_HEALTH: u32 = 100;

/// Integer grid coordinate expressed as a `(row, column)` pair.
///
/// Coordinates are signed so that jittered or offset points can be formed
/// freely; validity against a concrete board is checked with
/// [`CellCoord::is_within`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    row: i32,
    column: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub fn distance_squared(self, other: CellCoord) -> u32 {
        let dr = self.row.abs_diff(other.row);
        let dc = self.column.abs_diff(other.column);
        dr * dr + dc * dc
    }

    /// Returns the coordinate shifted by the provided row and column deltas.
    #[must_use]
    pub const fn offset(self, rows: i32, columns: i32) -> Self {
        Self::new(self.row + rows, self.column + columns)
    }

    /// Reports whether the coordinate lies on a square board of `size` cells.
    #[must_use]
    pub fn is_within(self, size: u32) -> bool {
        let limit = i64::from(size);
        (0..limit).contains(&i64::from(self.row)) && (0..limit).contains(&i64::from(self.column))
    }

    /// Clamps both components into `[low, high]`.
    #[must_use]
    pub fn clamped(self, low: i32, high: i32) -> Self {
        Self::new(self.row.clamp(low, high), self.column.clamp(low, high))
    }

    /// The four orthogonal neighbours in north, east, south, west order.
    ///
    /// Neighbours are not bounds-checked.
    #[must_use]
    pub const fn cardinal_neighbors(self) -> [CellCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
        ]
    }
}

/// Continuous position measured in cell units, used for effects.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellPoint {
    row: f32,
    column: f32,
}

impl CellPoint {
    /// Creates a new continuous cell-space point.
    #[must_use]
    pub const fn new(row: f32, column: f32) -> Self {
        Self { row, column }
    }

    /// Row component measured in cells.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Column component measured in cells.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Centre of the provided cell.
    #[must_use]
    pub fn cell_center(cell: CellCoord) -> Self {
        Self::new(cell.row() as f32 + 0.5, cell.column() as f32 + 0.5)
    }

    /// Cell containing the point, flooring both components.
    #[must_use]
    pub fn containing_cell(&self) -> CellCoord {
        CellCoord::new(self.row.floor() as i32, self.column.floor() as i32)
    }
}

/// Classification of a single terrain cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    /// Open ground.
    #[default]
    Empty,
    /// Impassable boulder that also blocks sight.
    Rock,
    /// Walkable cover that blocks sight.
    Tree,
    /// Impassable water that does not block sight.
    Water,
    /// Ammunition depot.
    SupplyAmmo,
    /// Medical depot.
    SupplyMed,
}

impl CellKind {
    /// Whether agents may stand on or walk through the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, CellKind::Rock | CellKind::Water)
    }

    /// Whether the cell interrupts line of sight and line of fire.
    #[must_use]
    pub const fn blocks_vision(self) -> bool {
        matches!(self, CellKind::Rock | CellKind::Tree)
    }

    /// Whether the cell offers cover to an adjacent agent.
    #[must_use]
    pub const fn is_cover(self) -> bool {
        self.blocks_vision()
    }
}

/// One of the two opposing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Side deployed in the north-west corner.
    Orange,
    /// Side deployed in the south-east corner.
    Blue,
}

impl Team {
    /// Both teams in tick order.
    pub const ALL: [Team; 2] = [Team::Orange, Team::Blue];

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Team {
        match self {
            Team::Orange => Team::Blue,
            Team::Blue => Team::Orange,
        }
    }

    /// Dense index suitable for per-team arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::Orange => 0,
            Team::Blue => 1,
        }
    }

    /// Point `inset` cells diagonally in from this team's home corner.
    ///
    /// Orange owns the low corner and Blue the high corner of a board with
    /// `size` cells per side.
    #[must_use]
    pub fn territory_point(self, size: u32, inset: i32) -> CellCoord {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        let axis = match self {
            Team::Orange => inset,
            Team::Blue => size - inset,
        };
        CellCoord::new(axis, axis).clamped(0, (size - 1).max(0))
    }

    /// Human readable team name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Team::Orange => "orange",
            Team::Blue => "blue",
        }
    }
}

/// Closed set of agent roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Owns the order queue and the team's strategy.
    Commander,
    /// Front-line combatant with a rifle and grenades.
    Warrior,
    /// Logistics unit that revives and heals teammates.
    Medic,
    /// Logistics unit that restocks warriors' ammunition.
    Provider,
}

impl Role {
    /// Logistics units never fire and route without danger bias.
    #[must_use]
    pub const fn is_logistics(self) -> bool {
        matches!(self, Role::Medic | Role::Provider)
    }
}

/// Unique identifier assigned to each agent at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kind of instruction carried by an [`Order`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderKind {
    /// Placeholder order that makes recipients stand down.
    #[default]
    None,
    /// Advance on the target cell and engage.
    Attack,
    /// Move to the target cell and hold.
    Defend,
    /// Revive the down teammate nearest the target cell.
    Heal,
    /// Restock the warrior standing near the target cell.
    Resupply,
    /// Walk to the target cell.
    Move,
}

impl OrderKind {
    /// Whether an agent with `role` should receive orders of this kind.
    #[must_use]
    pub const fn accepts(self, role: Role) -> bool {
        match self {
            OrderKind::Heal => matches!(role, Role::Medic),
            OrderKind::Resupply => matches!(role, Role::Provider),
            OrderKind::Attack | OrderKind::Defend => !role.is_logistics(),
            OrderKind::Move | OrderKind::None => true,
        }
    }
}

/// Immutable instruction broadcast by a commander.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Order {
    kind: OrderKind,
    target: CellCoord,
}

impl Order {
    /// Creates a new order of `kind` aimed at `target`.
    #[must_use]
    pub const fn new(kind: OrderKind, target: CellCoord) -> Self {
        Self { kind, target }
    }

    /// Kind of the order.
    #[must_use]
    pub const fn kind(&self) -> OrderKind {
        self.kind
    }

    /// Anchor cell of the order.
    #[must_use]
    pub const fn target(&self) -> CellCoord {
        self.target
    }
}

/// Result of a finished battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    winner: Option<Team>,
}

impl GameOutcome {
    /// Outcome where `team` is the last side standing.
    #[must_use]
    pub const fn victory(team: Team) -> Self {
        Self { winner: Some(team) }
    }

    /// Outcome where both sides were wiped out in the same frame.
    #[must_use]
    pub const fn draw() -> Self {
        Self { winner: None }
    }

    /// Winning team, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Banner announcing the outcome.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self.winner {
            Some(Team::Orange) => "ORANGE TEAM WINS!",
            Some(Team::Blue) => "BLUE TEAM WINS!",
            None => "DRAW!",
        }
    }
}

/// Events broadcast by the simulation while advancing a frame.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A commander appended an order to its queue.
    OrderIssued {
        /// Team whose commander issued the order.
        team: Team,
        /// Order that was queued.
        order: Order,
    },
    /// A queued order was handed to every compatible teammate.
    OrderDispatched {
        /// Team whose queue produced the order.
        team: Team,
        /// Order that was dispatched.
        order: Order,
        /// Number of agents that received a copy.
        recipients: u32,
    },
    /// A warrior fired a single shot.
    ShotFired {
        /// Agent that fired.
        shooter: AgentId,
        /// Agent that was hit.
        target: AgentId,
        /// Damage applied to the target.
        damage: u32,
    },
    /// A warrior threw a grenade.
    GrenadeThrown {
        /// Agent that threw the grenade.
        thrower: AgentId,
        /// Cell the blast was centred on.
        center: CellCoord,
        /// Number of enemies caught in the blast.
        hits: u32,
    },
    /// An agent's health reached zero.
    AgentDowned {
        /// Agent that went down.
        agent: AgentId,
    },
    /// A medic restored a teammate to full health.
    AgentRevived {
        /// Agent that was healed.
        agent: AgentId,
        /// Medic that performed the heal.
        medic: AgentId,
    },
    /// A provider refilled a warrior's ammunition and grenades.
    Resupplied {
        /// Warrior that was restocked.
        agent: AgentId,
        /// Provider that performed the resupply.
        provider: AgentId,
    },
    /// A commander left a dangerous cell for nearby cover.
    CommanderRelocating {
        /// Commander that is relocating.
        commander: AgentId,
        /// Cover cell chosen as destination.
        destination: CellCoord,
    },
    /// One or both teams were eliminated.
    GameOver {
        /// Final result of the battle.
        outcome: GameOutcome,
    },
}

/// Behavioral state an agent is currently executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StateKind {
    /// Waiting for the next order.
    #[default]
    Idle,
    /// Following a planned path toward its target.
    MoveToTarget,
}

/// Read-only view of an agent exposed to adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Identifier of the agent.
    pub id: AgentId,
    /// Team the agent fights for.
    pub team: Team,
    /// Role assigned at setup.
    pub role: Role,
    /// Cell currently occupied.
    pub cell: CellCoord,
    /// Cell the agent is heading toward.
    pub target: CellCoord,
    /// Whether the agent is standing.
    pub alive: bool,
    /// Remaining health in `[0, MAX_HEALTH]`.
    pub health: u32,
    /// Remaining ammunition.
    pub ammo: u32,
    /// Remaining grenades.
    pub grenades: u32,
    /// Whether the agent still has path cells to consume.
    pub moving: bool,
    /// Active behavioral state.
    pub state: StateKind,
}

/// Visual category of a transient effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Bullet tracer travelling away from a shooter.
    Tracer,
    /// Expanding grenade blast.
    Blast,
}

/// Read-only view of a transient effect exposed to adapters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    /// Visual category.
    pub kind: EffectKind,
    /// Current position in cell space.
    pub position: CellPoint,
    /// Radius of the effect in cells.
    pub radius: f32,
    /// Frames left before the effect expires.
    pub remaining_frames: u32,
}
