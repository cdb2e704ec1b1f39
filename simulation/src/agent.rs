//! Agent attributes shared by every role, plus the role-specific payloads.

use skirmish_core::{
    AgentId, AgentSnapshot, CellCoord, Role, StateKind, Team, MAX_HEALTH,
};
use skirmish_world::VisibilityMask;

use crate::orders::OrderQueue;

/// Planned route and the cursor of the next cell to step onto.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Route {
    cells: Vec<CellCoord>,
    cursor: usize,
}

impl Route {
    /// Replaces the route and rewinds the cursor.
    pub(crate) fn replace(&mut self, cells: Vec<CellCoord>) {
        self.cells = cells;
        self.cursor = 0;
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.cursor = 0;
    }

    /// Whether cells remain to be consumed.
    pub(crate) fn is_moving(&self) -> bool {
        self.cursor < self.cells.len()
    }

    pub(crate) fn next(&self) -> Option<CellCoord> {
        self.cells.get(self.cursor).copied()
    }

    pub(crate) fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.cells.len());
    }

    pub(crate) fn destination(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }
}

/// How a route is costed when it is planned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Routing {
    /// Detour around the team's danger field when a weighted path exists.
    #[default]
    Cautious,
    /// Shortest path, ignoring danger.
    Direct,
}

/// Engagement stance of a warrior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum CombatMode {
    #[default]
    None,
    Attacking,
    Defending,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct WarriorState {
    pub(crate) mode: CombatMode,
    pub(crate) fire_cooldown: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CommanderState {
    pub(crate) orders: OrderQueue,
    pub(crate) frames: u64,
    pub(crate) last_resupply_request: Option<u64>,
    pub(crate) team_visibility: VisibilityMask,
}

/// Service a logistics unit delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Duty {
    Heal,
    Resupply,
}

/// Leg of the storage, recipient, home round trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Errand {
    #[default]
    Idle,
    ToStorage,
    ToRecipient,
    Home,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LogisticsState {
    pub(crate) duty: Duty,
    pub(crate) errand: Errand,
    pub(crate) recipient: Option<AgentId>,
    pub(crate) last_known: CellCoord,
    pub(crate) replan_cooldown: u32,
    pub(crate) home: CellCoord,
}

impl LogisticsState {
    pub(crate) fn new(duty: Duty, home: CellCoord) -> Self {
        Self {
            duty,
            errand: Errand::Idle,
            recipient: None,
            last_known: home,
            replan_cooldown: 0,
            home,
        }
    }

    /// Forgets the current recipient and leg.
    pub(crate) fn reset(&mut self) {
        self.errand = Errand::Idle;
        self.recipient = None;
    }
}

/// Role tag together with the data only that role carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RoleState {
    Commander(CommanderState),
    Warrior(WarriorState),
    Logistics(LogisticsState),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) team: Team,
    pub(crate) cell: CellCoord,
    pub(crate) target: CellCoord,
    pub(crate) health: u32,
    pub(crate) ammo: u32,
    pub(crate) grenades: u32,
    pub(crate) visibility: VisibilityMask,
    pub(crate) route: Route,
    pub(crate) routing: Routing,
    pub(crate) state: StateKind,
    pub(crate) move_delay: u32,
    pub(crate) role: RoleState,
}

impl Agent {
    pub(crate) fn role(&self) -> Role {
        match &self.role {
            RoleState::Commander(_) => Role::Commander,
            RoleState::Warrior(_) => Role::Warrior,
            RoleState::Logistics(state) => match state.duty {
                Duty::Heal => Role::Medic,
                Duty::Resupply => Role::Provider,
            },
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub(crate) fn is_moving(&self) -> bool {
        self.route.is_moving()
    }

    /// Subtracts `amount` health. Returns `true` when this blow downs the agent.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.is_alive() {
            return false;
        }
        self.route.clear();
        self.state = StateKind::Idle;
        self.move_delay = 0;
        if let RoleState::Logistics(logistics) = &mut self.role {
            logistics.reset();
        }
        true
    }

    /// Restores full health and stops any motion. Returns `true` if the agent was down.
    pub(crate) fn heal_full(&mut self) -> bool {
        let revived = !self.is_alive();
        self.health = MAX_HEALTH;
        self.route.clear();
        self.state = StateKind::Idle;
        self.move_delay = 0;
        revived
    }

    pub(crate) fn refill(&mut self, ammo: u32, grenades: u32) {
        self.ammo = ammo;
        self.grenades = grenades;
    }

    pub(crate) fn spend_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_sub(amount);
    }

    pub(crate) fn warrior(&self) -> Option<&WarriorState> {
        match &self.role {
            RoleState::Warrior(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn warrior_mut(&mut self) -> Option<&mut WarriorState> {
        match &mut self.role {
            RoleState::Warrior(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn commander(&self) -> Option<&CommanderState> {
        match &self.role {
            RoleState::Commander(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn commander_mut(&mut self) -> Option<&mut CommanderState> {
        match &mut self.role {
            RoleState::Commander(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn logistics(&self) -> Option<&LogisticsState> {
        match &self.role {
            RoleState::Logistics(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn logistics_mut(&mut self) -> Option<&mut LogisticsState> {
        match &mut self.role {
            RoleState::Logistics(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            team: self.team,
            role: self.role(),
            cell: self.cell,
            target: self.target,
            alive: self.is_alive(),
            health: self.health,
            ammo: self.ammo,
            grenades: self.grenades,
            moving: self.is_moving(),
            state: self.state,
        }
    }
}
