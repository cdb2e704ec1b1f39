#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for the Skirmish simulation.
//!
//! A [`Simulation`] owns the terrain, both rosters, both teams' danger
//! fields and the transient effect pool. Adapters drive it one frame at a
//! time through [`advance`], which runs the fixed per-frame ordering:
//!
//! 1. rebuild both danger fields from living enemy positions;
//! 2. queue priority heals for down teammates;
//! 3. run each living commander's strategic schedule;
//! 4. let warriors of a leaderless team shoot at anything in range;
//! 5. dispatch one queued order per team;
//! 6. tick every living agent, team by team;
//! 7. give every warrior a final direct shot at current positions;
//! 8. check for elimination;
//! 9. merge each team's visibility into its commander's view.
//!
//! Read-only views for drawing live in [`query`].

mod agent;
mod commander;
mod effects;
mod error;
mod logistics;
mod orders;
mod state;
mod tuning;
mod warrior;

#[cfg(test)]
mod scenarios;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::{
    AgentId, CellCoord, Event, GameOutcome, Order, OrderKind, Role, StateKind, Team, MAX_HEALTH,
};
use skirmish_system_pathfinding::Pathfinder;
use skirmish_world::{Battlefield, DangerField, TeamDepots, TerrainGrid, VisibilityMask};
use tracing::{debug, info};

use crate::{
    agent::{
        Agent, CombatMode, CommanderState, Duty, LogisticsState, RoleState, Route, Routing,
        WarriorState,
    },
    effects::EffectPool,
    orders::OrderQueue,
};

pub use error::{Result, SetupError};
pub use tuning::{
    CombatTuning, CommandTuning, EffectTuning, LogisticsTuning, MovementTuning, PerceptionTuning,
    SimulationTuning,
};

/// Complete state of a running battle.
#[derive(Debug)]
pub struct Simulation {
    terrain: TerrainGrid,
    depots: [TeamDepots; 2],
    agents: Vec<Agent>,
    danger: [DangerField; 2],
    effects: EffectPool,
    pathfinder: Pathfinder,
    tuning: SimulationTuning,
    rng: ChaCha8Rng,
    frame: u64,
    outcome: Option<GameOutcome>,
    journal: Vec<Event>,
}

impl Simulation {
    /// Validates `battlefield` and deploys both rosters.
    ///
    /// Each commander starts with an attack order aimed deep into enemy
    /// territory. `seed` feeds the commanders' policy rolls and the
    /// warriors' retreat jitter.
    pub fn new(battlefield: Battlefield, tuning: SimulationTuning, seed: u64) -> Result<Self> {
        let Battlefield {
            terrain,
            depots,
            deployments,
        } = battlefield;
        let size = terrain.size();

        for team in Team::ALL {
            let team_depots = depots[team.index()];
            for cell in [team_depots.ammo, team_depots.medical] {
                if !terrain.in_bounds(cell) {
                    return Err(SetupError::DepotOffBoard { team, cell });
                }
            }
            let count = deployments
                .iter()
                .filter(|deployment| deployment.team == team && deployment.role == Role::Commander)
                .count();
            if count > 1 {
                return Err(SetupError::DuplicateCommander { team, count });
            }
        }

        let mut agents = Vec::with_capacity(deployments.len());
        for (index, deployment) in deployments.into_iter().enumerate() {
            let cell = deployment.cell;
            if !terrain.in_bounds(cell) {
                return Err(SetupError::DeploymentOffBoard { index, cell });
            }
            if !terrain.passable(cell) {
                return Err(SetupError::DeploymentBlocked { index, cell });
            }

            let role = match deployment.role {
                Role::Commander => RoleState::Commander(CommanderState {
                    orders: OrderQueue::default(),
                    frames: 0,
                    last_resupply_request: None,
                    team_visibility: VisibilityMask::new(size),
                }),
                Role::Warrior => RoleState::Warrior(WarriorState {
                    mode: CombatMode::None,
                    fire_cooldown: 0,
                }),
                Role::Medic => RoleState::Logistics(LogisticsState::new(Duty::Heal, cell)),
                Role::Provider => RoleState::Logistics(LogisticsState::new(Duty::Resupply, cell)),
            };
            let grenades = if deployment.role == Role::Warrior {
                tuning.combat.max_grenades
            } else {
                0
            };

            agents.push(Agent {
                id: AgentId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                team: deployment.team,
                cell,
                target: cell,
                health: MAX_HEALTH,
                ammo: tuning.combat.max_ammo,
                grenades,
                visibility: VisibilityMask::new(size),
                route: Route::default(),
                routing: Routing::Cautious,
                state: StateKind::Idle,
                move_delay: 0,
                role,
            });
        }

        let mut simulation = Self {
            danger: [DangerField::new(size), DangerField::new(size)],
            terrain,
            depots,
            agents,
            effects: EffectPool::default(),
            pathfinder: Pathfinder::new(),
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            frame: 0,
            outcome: None,
            journal: Vec::new(),
        };

        for team in Team::ALL {
            let opening = team
                .opponent()
                .territory_point(size, simulation.tuning.command.assault_inset);
            simulation.issue_order(team, Order::new(OrderKind::Attack, opening));
        }

        info!(
            agents = simulation.agents.len(),
            size, "battlefield deployed"
        );
        Ok(simulation)
    }

    fn run_frame(&mut self) {
        self.frame += 1;

        if self.outcome.is_none() {
            self.refresh_danger();

            for team in Team::ALL {
                self.queue_auto_heal(team);
            }

            for team in Team::ALL {
                if let Some(commander) = self.living_commander(team) {
                    self.run_strategy(commander);
                }
            }

            for team in Team::ALL {
                if self.living_commander(team).is_none() {
                    for warrior in self.members_with_role(team, Role::Warrior) {
                        self.try_direct_attack(warrior);
                    }
                }
            }

            for team in Team::ALL {
                self.dispatch_orders(team);
            }

            for team in Team::ALL {
                for id in self.members(team) {
                    if self.agent(id).is_alive() {
                        self.tick_agent(id);
                    }
                }
            }

            for team in Team::ALL {
                for warrior in self.members_with_role(team, Role::Warrior) {
                    self.try_direct_attack(warrior);
                }
            }

            self.check_victory();

            for team in Team::ALL {
                self.aggregate_team_visibility(team);
            }
        }

        self.effects.advance(&self.tuning.effects, &self.terrain);
    }

    fn refresh_danger(&mut self) {
        for team in Team::ALL {
            let enemy = team.opponent();
            let positions: Vec<CellCoord> = self
                .agents
                .iter()
                .filter(|agent| agent.team == enemy && agent.is_alive())
                .map(|agent| agent.cell)
                .collect();
            self.danger[team.index()].recompute(positions);
        }
    }

    fn tick_agent(&mut self, id: AgentId) {
        let radius = self.tuning.perception.sight_radius;
        let terrain = &self.terrain;
        let agent = &mut self.agents[slot(id)];
        let origin = agent.cell;
        agent.visibility.recompute(terrain, origin, radius);

        self.tick_state(id);

        match self.agent(id).role() {
            Role::Commander => self.commander_tick(id),
            Role::Warrior => self.warrior_tick(id),
            Role::Medic | Role::Provider => self.logistics_tick(id),
        }
    }

    fn check_victory(&mut self) {
        let standing = |team: Team| {
            self.agents
                .iter()
                .any(|agent| agent.team == team && agent.is_alive())
        };
        let outcome = match (standing(Team::Orange), standing(Team::Blue)) {
            (true, true) => return,
            (true, false) => GameOutcome::victory(Team::Orange),
            (false, true) => GameOutcome::victory(Team::Blue),
            (false, false) => GameOutcome::draw(),
        };

        info!(frame = self.frame, result = outcome.message(), "battle over");
        self.outcome = Some(outcome);
        self.journal.push(Event::GameOver { outcome });
    }

    pub(crate) fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[slot(id)]
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[slot(id)]
    }

    /// Every agent of `team` in roster order.
    pub(crate) fn members(&self, team: Team) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|agent| agent.team == team)
            .map(|agent| agent.id)
            .collect()
    }

    pub(crate) fn members_with_role(&self, team: Team, role: Role) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|agent| agent.team == team && agent.role() == role)
            .map(|agent| agent.id)
            .collect()
    }

    pub(crate) fn first_with_role(&self, team: Team, role: Role) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|agent| agent.team == team && agent.role() == role)
            .map(|agent| agent.id)
    }

    pub(crate) fn living_commander(&self, team: Team) -> Option<AgentId> {
        self.first_with_role(team, Role::Commander)
            .filter(|id| self.agent(*id).is_alive())
    }

    /// Living agents opposing `team`.
    pub(crate) fn living_enemies(&self, team: Team) -> impl Iterator<Item = &Agent> {
        let enemy = team.opponent();
        self.agents
            .iter()
            .filter(move |agent| agent.team == enemy && agent.is_alive())
    }

    pub(crate) fn depots_of(&self, team: Team) -> TeamDepots {
        self.depots[team.index()]
    }

    /// Queues `order` on the team commander, if the team has one.
    pub(crate) fn issue_order(&mut self, team: Team, order: Order) {
        let Some(commander) = self.first_with_role(team, Role::Commander) else {
            return;
        };
        let Some(state) = self.agent_mut(commander).commander_mut() else {
            return;
        };
        state.orders.push(order);
        debug!(team = team.name(), ?order, "order issued");
        self.journal.push(Event::OrderIssued { team, order });
    }

    /// Offsets `center` by up to `jitter` cells per axis, clamped to the board.
    pub(crate) fn jittered(&mut self, center: CellCoord, jitter: i32) -> CellCoord {
        let jitter = jitter.max(0);
        let rows = self.rng.gen_range(-jitter..=jitter);
        let columns = self.rng.gen_range(-jitter..=jitter);
        let limit = i32::try_from(self.terrain.size()).unwrap_or(i32::MAX) - 1;
        center.offset(rows, columns).clamped(0, limit.max(0))
    }
}

/// Advances the simulation by one frame, appending the frame's events.
///
/// After the battle is decided only the effect pool keeps ageing.
pub fn advance(simulation: &mut Simulation, out_events: &mut Vec<Event>) {
    simulation.run_frame();
    out_events.append(&mut simulation.journal);
}

fn slot(id: AgentId) -> usize {
    usize::try_from(id.get()).unwrap_or(usize::MAX)
}

/// Query functions that provide read-only access to the simulation state.
pub mod query {
    use skirmish_core::{AgentId, AgentSnapshot, EffectSnapshot, GameOutcome, Order, Team};
    use skirmish_world::{DangerField, TeamDepots, TerrainGrid, VisibilityMask};

    use super::{slot, Simulation};

    /// Provides read-only access to the terrain grid.
    #[must_use]
    pub fn terrain(simulation: &Simulation) -> &TerrainGrid {
        &simulation.terrain
    }

    /// Depots owned by `team`.
    #[must_use]
    pub fn depots(simulation: &Simulation, team: Team) -> TeamDepots {
        simulation.depots_of(team)
    }

    /// Number of frames advanced so far.
    #[must_use]
    pub fn frame(simulation: &Simulation) -> u64 {
        simulation.frame
    }

    /// Captures every agent in roster order.
    #[must_use]
    pub fn agents(simulation: &Simulation) -> Vec<AgentSnapshot> {
        simulation.agents.iter().map(|agent| agent.snapshot()).collect()
    }

    /// Captures a single agent.
    #[must_use]
    pub fn agent(simulation: &Simulation, id: AgentId) -> Option<AgentSnapshot> {
        simulation.agents.get(slot(id)).map(|agent| agent.snapshot())
    }

    /// Cells the agent saw during its most recent tick.
    #[must_use]
    pub fn visibility(simulation: &Simulation, id: AgentId) -> Option<&VisibilityMask> {
        simulation.agents.get(slot(id)).map(|agent| &agent.visibility)
    }

    /// Combined view gathered by the team's commander; empty once it is down.
    #[must_use]
    pub fn team_visibility(simulation: &Simulation, team: Team) -> Option<&VisibilityMask> {
        simulation
            .agents
            .iter()
            .filter(|agent| agent.team == team)
            .find_map(|agent| agent.commander())
            .map(|state| &state.team_visibility)
    }

    /// Threat field that biases `team`'s routes.
    #[must_use]
    pub fn danger(simulation: &Simulation, team: Team) -> &DangerField {
        &simulation.danger[team.index()]
    }

    /// Orders still waiting in the team commander's queue, front first.
    #[must_use]
    pub fn pending_orders(simulation: &Simulation, team: Team) -> Vec<Order> {
        simulation
            .agents
            .iter()
            .filter(|agent| agent.team == team)
            .find_map(|agent| agent.commander())
            .map(|state| state.orders.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Live tracer and blast effects.
    #[must_use]
    pub fn effects(simulation: &Simulation) -> Vec<EffectSnapshot> {
        simulation.effects.snapshots()
    }

    /// Result of the battle once one side has been eliminated.
    #[must_use]
    pub fn outcome(simulation: &Simulation) -> Option<GameOutcome> {
        simulation.outcome
    }
}
