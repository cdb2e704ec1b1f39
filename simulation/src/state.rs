//! Idle / MoveToTarget state machine shared by every role.
//!
//! An agent holds exactly one [`StateKind`]. Transitions run the exit hook
//! of the old state, install the new one and run its enter hook. Entering
//! `MoveToTarget` plans a route to the agent's target; a failed plan drops
//! the agent straight back to `Idle`.

use skirmish_core::{AgentId, CellCoord, Order, OrderKind, Role, StateKind};
use tracing::{debug, trace};

use crate::{
    agent::{CombatMode, Routing},
    Simulation,
};

/// Result of consuming one tick of route movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Moving,
    Blocked,
    Arrived,
}

impl Simulation {
    /// Runs the per-tick behavior of the agent's current state.
    pub(crate) fn tick_state(&mut self, id: AgentId) {
        match self.agent(id).state {
            StateKind::Idle => {}
            StateKind::MoveToTarget => match self.step_along_route(id) {
                Step::Moving | Step::Blocked => {}
                Step::Arrived => self.on_route_complete(id),
            },
        }
    }

    fn step_along_route(&mut self, id: AgentId) -> Step {
        let delay = self.tuning.movement.delay_frames;
        let terrain = &self.terrain;
        let agent = &mut self.agents[crate::slot(id)];

        let Some(next) = agent.route.next() else {
            return Step::Arrived;
        };
        if !terrain.passable(next) {
            return Step::Blocked;
        }
        if agent.move_delay > 0 {
            agent.move_delay -= 1;
            return Step::Moving;
        }

        agent.move_delay = delay;
        agent.cell = next;
        agent.route.advance();
        if agent.route.is_moving() {
            Step::Moving
        } else {
            Step::Arrived
        }
    }

    fn on_route_complete(&mut self, id: AgentId) {
        match self.agent(id).role() {
            Role::Medic | Role::Provider => self.logistics_arrived(id),
            Role::Commander | Role::Warrior => self.transition(id, StateKind::Idle),
        }
    }

    /// Swaps the agent's state, running the exit and enter hooks.
    pub(crate) fn transition(&mut self, id: AgentId, next: StateKind) {
        let previous = std::mem::replace(&mut self.agent_mut(id).state, next);
        self.exit_state(id, previous);
        self.enter_state(id, next);
    }

    fn exit_state(&mut self, id: AgentId, previous: StateKind) {
        trace!(agent = id.get(), ?previous, "leaving state");
    }

    fn enter_state(&mut self, id: AgentId, next: StateKind) {
        match next {
            StateKind::Idle => self.agent_mut(id).route.clear(),
            StateKind::MoveToTarget => {
                let goal = self.agent(id).target;
                if !self.plan_route(id, goal) {
                    self.transition(id, StateKind::Idle);
                }
            }
        }
    }

    /// Plans and installs a route to `goal`.
    ///
    /// Combatants on a cautious move use their team's danger field and fall
    /// back to an unweighted search. Direct moves and logistics units always
    /// plan unweighted. Returns `false` and clears the route when no path
    /// exists.
    pub(crate) fn plan_route(&mut self, id: AgentId, goal: CellCoord) -> bool {
        let agent = self.agent(id);
        let start = agent.cell;
        let weighted = !agent.role().is_logistics() && agent.routing == Routing::Cautious;
        let danger = &self.danger[agent.team.index()];

        let mut route = None;
        if weighted {
            route = self
                .pathfinder
                .find_path(&self.terrain, start, goal, Some(danger));
        }
        if route.is_none() {
            route = self.pathfinder.find_path(&self.terrain, start, goal, None);
        }

        let agent = &mut self.agents[crate::slot(id)];
        match route {
            Some(cells) => {
                trace!(agent = id.get(), ?goal, steps = cells.len(), "route planned");
                agent.route.replace(cells);
                true
            }
            None => {
                debug!(agent = id.get(), ?start, ?goal, "no route");
                agent.route.clear();
                false
            }
        }
    }

    /// Stops motion and drops back to idle.
    pub(crate) fn halt(&mut self, id: AgentId) {
        self.agent_mut(id).route.clear();
        if self.agent(id).state != StateKind::Idle {
            self.transition(id, StateKind::Idle);
        }
    }

    /// Sets a new target and enters `MoveToTarget`. Returns whether a route was found.
    pub(crate) fn move_to(&mut self, id: AgentId, target: CellCoord) -> bool {
        self.move_with(id, target, Routing::Cautious)
    }

    /// Like [`Self::move_to`], choosing how the route is costed.
    pub(crate) fn move_with(&mut self, id: AgentId, target: CellCoord, routing: Routing) -> bool {
        let agent = self.agent_mut(id);
        agent.target = target;
        agent.routing = routing;
        self.transition(id, StateKind::MoveToTarget);
        self.agent(id).state == StateKind::MoveToTarget
    }

    /// Delivers a dispatched order to a single recipient.
    pub(crate) fn receive_order(&mut self, id: AgentId, order: Order) {
        let target = order.target();
        if !self.terrain.in_bounds(target) {
            debug!(agent = id.get(), ?order, "order target off the board");
            self.halt(id);
            return;
        }

        let role = self.agent(id).role();
        match (role, order.kind()) {
            (Role::Warrior, OrderKind::Attack | OrderKind::Defend) => {
                let mode = if order.kind() == OrderKind::Attack {
                    CombatMode::Attacking
                } else {
                    CombatMode::Defending
                };
                if let Some(warrior) = self.agent_mut(id).warrior_mut() {
                    warrior.mode = mode;
                }
                let _ = self.move_to(id, target);
            }
            (Role::Medic, OrderKind::Heal) | (Role::Provider, OrderKind::Resupply) => {
                self.begin_errand(id, target);
            }
            (_, OrderKind::Move | OrderKind::Attack | OrderKind::Defend) => {
                if let Some(logistics) = self.agent_mut(id).logistics_mut() {
                    logistics.reset();
                }
                let _ = self.move_to(id, target);
            }
            _ => {
                if let Some(logistics) = self.agent_mut(id).logistics_mut() {
                    logistics.reset();
                }
                self.halt(id);
            }
        }
    }
}
