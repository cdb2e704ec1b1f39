//! Commander duties: order dispatch, strategic policy, support requests and
//! taking cover.

use rand::Rng;
use skirmish_core::{AgentId, CellCoord, Event, Order, OrderKind, Role, StateKind, Team};
use skirmish_world::VisibilityMask;
use tracing::debug;

use crate::Simulation;

impl Simulation {
    /// Queues a priority heal for the first down teammate when the medic is free.
    pub(crate) fn queue_auto_heal(&mut self, team: Team) {
        let Some(commander) = self.first_with_role(team, Role::Commander) else {
            return;
        };
        let Some(medic) = self.first_with_role(team, Role::Medic) else {
            return;
        };
        let medic_agent = self.agent(medic);
        if !medic_agent.is_alive() || medic_agent.is_moving() {
            return;
        }
        if self
            .agent(commander)
            .commander()
            .map_or(true, |state| state.orders.has_pending(OrderKind::Heal))
        {
            return;
        }

        let down = self
            .agents
            .iter()
            .find(|agent| agent.team == team && agent.id != medic && !agent.is_alive())
            .map(|agent| agent.cell);
        if let Some(cell) = down {
            self.issue_order(team, Order::new(OrderKind::Heal, cell));
        }
    }

    /// Advances the commander's schedule and applies the policy when due.
    pub(crate) fn run_strategy(&mut self, id: AgentId) {
        let warmup = self.tuning.command.warmup_frames;
        let interval = self.tuning.command.interval_frames.max(1);
        let Some(state) = self.agent_mut(id).commander_mut() else {
            return;
        };
        state.frames += 1;
        let frames = state.frames;
        if frames < warmup || frames % interval != 0 {
            return;
        }

        let team = self.agent(id).team;
        let size = self.terrain.size();
        let command = self.tuning.command.clone();
        let enemy = team.opponent();

        let enemy_warriors_remain = self
            .living_enemies(team)
            .any(|agent| agent.role() == Role::Warrior);
        if !enemy_warriors_remain {
            let targets: Vec<CellCoord> = self
                .living_enemies(team)
                .map(|agent| agent.cell)
                .collect();
            if targets.is_empty() {
                let rally = enemy.territory_point(size, command.final_rally_inset);
                self.issue_order(team, Order::new(OrderKind::Attack, rally));
            }
            for cell in targets {
                self.issue_order(team, Order::new(OrderKind::Attack, cell));
            }
            return;
        }

        let total = command.attack_weight + command.defend_weight + command.hold_weight;
        if total == 0 {
            return;
        }
        let roll = self.rng.gen_range(0..total);
        if roll < command.attack_weight {
            let anchor = enemy.territory_point(size, command.assault_inset);
            let point = self.jittered(anchor, command.attack_jitter);
            self.issue_order(team, Order::new(OrderKind::Attack, point));
        } else if roll < command.attack_weight + command.defend_weight {
            let anchor = team.territory_point(size, command.defend_inset);
            let point = self.jittered(anchor, command.defend_jitter);
            self.issue_order(team, Order::new(OrderKind::Defend, point));
        } else {
            debug!(team = team.name(), frames, "holding");
        }
    }

    /// Hands the next queued order to every compatible living teammate.
    ///
    /// Dispatch keeps running after the commander goes down so that queued
    /// heals can still bring it back.
    pub(crate) fn dispatch_orders(&mut self, team: Team) {
        let Some(commander) = self.first_with_role(team, Role::Commander) else {
            return;
        };
        let Some(order) = self
            .agent_mut(commander)
            .commander_mut()
            .and_then(|state| state.orders.take_next())
        else {
            return;
        };

        let recipients: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|agent| {
                agent.team == team
                    && agent.id != commander
                    && agent.is_alive()
                    && order.kind().accepts(agent.role())
            })
            .map(|agent| agent.id)
            .collect();

        for recipient in &recipients {
            self.receive_order(*recipient, order);
        }

        let count = u32::try_from(recipients.len()).unwrap_or(u32::MAX);
        debug!(team = team.name(), ?order, recipients = count, "order dispatched");
        self.journal.push(Event::OrderDispatched {
            team,
            order,
            recipients: count,
        });
    }

    /// Per-tick commander logic, run after movement.
    pub(crate) fn commander_tick(&mut self, id: AgentId) {
        let team = self.agent(id).team;
        self.aggregate_team_visibility(team);
        self.request_resupply(id);
        self.seek_cover(id);
    }

    /// Rebuilds the commander's combined view; a down commander sees nothing.
    pub(crate) fn aggregate_team_visibility(&mut self, team: Team) {
        let Some(commander) = self.first_with_role(team, Role::Commander) else {
            return;
        };
        let size = self.terrain.size();
        let mut combined = VisibilityMask::new(size);
        if self.agent(commander).is_alive() {
            for agent in self.agents.iter().filter(|agent| agent.team == team) {
                combined.merge(&agent.visibility);
            }
        }
        if let Some(state) = self.agent_mut(commander).commander_mut() {
            state.team_visibility = combined;
        }
    }

    /// Asks an idle provider to restock a dry warrior near the ammo depot.
    fn request_resupply(&mut self, id: AgentId) {
        let command = &self.tuning.command;
        let agent = self.agent(id);
        let team = agent.team;
        let Some(state) = agent.commander() else {
            return;
        };
        if state.orders.has_pending(OrderKind::Resupply) {
            return;
        }
        if state
            .last_resupply_request
            .is_some_and(|frame| self.frame < frame + command.resupply_request_interval)
        {
            return;
        }

        let provider_idle = self
            .first_with_role(team, Role::Provider)
            .map(|provider| self.agent(provider))
            .is_some_and(|provider| {
                provider.is_alive() && !provider.is_moving() && provider.state == StateKind::Idle
            });
        if !provider_idle {
            return;
        }

        let ammo_depot = self.depots_of(team).ammo;
        let candidate = self
            .agents
            .iter()
            .find(|agent| {
                agent.team == team
                    && agent.role() == Role::Warrior
                    && agent.is_alive()
                    && agent.ammo <= command.resupply_ammo_threshold
                    && agent.cell.manhattan_distance(ammo_depot) <= command.resupply_depot_radius
            })
            .map(|agent| agent.cell);

        if let Some(cell) = candidate {
            let frame = self.frame;
            if let Some(state) = self.agent_mut(id).commander_mut() {
                state.last_resupply_request = Some(frame);
            }
            self.issue_order(team, Order::new(OrderKind::Resupply, cell));
        }
    }

    /// Moves the commander to nearby cover when its cell is too dangerous.
    ///
    /// Rings of growing radius are scanned; the first ring holding a passable
    /// cell that is less dangerous than the current one and touches rock or
    /// tree provides the destination, picking the least dangerous such cell.
    fn seek_cover(&mut self, id: AgentId) {
        let agent = self.agent(id);
        let origin = agent.cell;
        let danger = &self.danger[agent.team.index()];
        let current = danger.value_at(origin);
        if current < self.tuning.command.relocation_danger {
            return;
        }

        let mut best: Option<(u8, CellCoord)> = None;
        for radius in 1..=self.tuning.command.relocation_radius {
            for rows in -radius..=radius {
                for columns in -radius..=radius {
                    if rows.abs() != radius && columns.abs() != radius {
                        continue;
                    }
                    let cell = origin.offset(rows, columns);
                    if !self.terrain.passable(cell) || !self.terrain.has_adjacent_cover(cell) {
                        continue;
                    }
                    let value = danger.value_at(cell);
                    let bar = best.map_or(current, |(lowest, _)| lowest);
                    if value < bar {
                        best = Some((value, cell));
                    }
                }
            }
            if best.is_some() {
                break;
            }
        }

        let Some((_, destination)) = best else {
            return;
        };
        if agent.state == StateKind::MoveToTarget && agent.target == destination {
            return;
        }
        if self
            .pathfinder
            .find_path(&self.terrain, origin, destination, None)
            .is_none()
        {
            return;
        }

        debug!(commander = id.get(), ?destination, danger = current, "taking cover");
        self.journal.push(Event::CommanderRelocating {
            commander: id,
            destination,
        });
        let _ = self.move_to(id, destination);
    }
}
