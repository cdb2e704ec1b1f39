//! Medic and provider errands.
//!
//! Both logistics roles run the same round trip: walk to their depot, walk
//! to the recipient, deliver, walk home. They differ only in who counts as
//! a recipient and what is delivered. Every leg is planned without danger
//! bias, and any planning failure drops the unit to idle.

use skirmish_core::{AgentId, CellCoord, Event, Order, OrderKind, Role, StateKind, MAX_HEALTH};
use tracing::{debug, info};

use crate::{
    agent::{Duty, Errand},
    Simulation,
};

impl Simulation {
    /// Starts an ordered errand for the recipient nearest to `anchor`.
    pub(crate) fn begin_errand(&mut self, id: AgentId, anchor: CellCoord) {
        match self.pick_recipient(id, anchor) {
            Some(recipient) => self.start_errand(id, recipient),
            None => {
                debug!(agent = id.get(), ?anchor, "no recipient for errand");
                self.abandon_errand(id);
            }
        }
    }

    /// Per-tick logistics logic, run after movement.
    pub(crate) fn logistics_tick(&mut self, id: AgentId) {
        let drift = self.tuning.logistics.drift_threshold;
        let Some(state) = self.agent_mut(id).logistics_mut() else {
            return;
        };
        state.replan_cooldown = state.replan_cooldown.saturating_sub(1);
        let (duty, errand, recipient, last_known, cooldown) = (
            state.duty,
            state.errand,
            state.recipient,
            state.last_known,
            state.replan_cooldown,
        );

        match errand {
            Errand::Idle => {
                if duty == Duty::Heal && !self.agent(id).is_moving() {
                    self.notice_wounded_near_depot(id);
                }
            }
            Errand::ToRecipient => {
                let Some(recipient) = recipient.filter(|r| self.still_eligible(duty, *r)) else {
                    self.go_home(id);
                    return;
                };
                let live = self.agent(recipient).cell;
                if live.manhattan_distance(last_known) >= drift && cooldown == 0 {
                    self.chase(id, recipient);
                }
            }
            Errand::ToStorage | Errand::Home => {}
        }
    }

    /// Route-completion hook for medics and providers.
    pub(crate) fn logistics_arrived(&mut self, id: AgentId) {
        let errand = self
            .agent(id)
            .logistics()
            .map_or(Errand::Idle, |state| state.errand);
        match errand {
            Errand::ToStorage => self.reached_storage(id),
            Errand::ToRecipient => self.reached_recipient(id),
            Errand::Home | Errand::Idle => self.abandon_errand(id),
        }
    }

    fn reached_storage(&mut self, id: AgentId) {
        let Some(state) = self.agent(id).logistics() else {
            return;
        };
        let (duty, recipient) = (state.duty, state.recipient);

        match duty {
            Duty::Heal => {
                let recipient = recipient
                    .filter(|r| self.still_eligible(duty, *r))
                    .or_else(|| self.nearest_wounded(id));
                match recipient {
                    Some(recipient) => self.head_to_recipient(id, recipient),
                    None => self.go_home(id),
                }
            }
            Duty::Resupply => {
                let Some(recipient) = recipient.filter(|r| self.still_eligible(duty, *r)) else {
                    self.abandon_errand(id);
                    return;
                };
                if self.agent(recipient).cell == self.agent(id).cell {
                    debug!(agent = id.get(), recipient = recipient.get(), "recipient at depot");
                    self.abandon_errand(id);
                } else {
                    self.head_to_recipient(id, recipient);
                }
            }
        }
    }

    fn reached_recipient(&mut self, id: AgentId) {
        let drift = self.tuning.logistics.drift_threshold;
        let Some(state) = self.agent(id).logistics() else {
            return;
        };
        let (duty, cooldown) = (state.duty, state.replan_cooldown);
        let Some(recipient) = state.recipient.filter(|r| self.still_eligible(duty, *r)) else {
            self.go_home(id);
            return;
        };

        let gap = self
            .agent(id)
            .cell
            .manhattan_distance(self.agent(recipient).cell);
        if gap >= drift {
            if cooldown == 0 {
                self.chase(id, recipient);
            }
            return;
        }

        self.deliver(id, recipient);
        self.go_home(id);
    }

    fn deliver(&mut self, id: AgentId, recipient: AgentId) {
        let Some(duty) = self.agent(id).logistics().map(|state| state.duty) else {
            return;
        };
        let team = self.agent(id).team;

        match duty {
            Duty::Heal => {
                let patient = self.agent_mut(recipient);
                let revived = patient.heal_full();
                let cell = patient.cell;
                info!(medic = id.get(), agent = recipient.get(), revived, "healed");
                self.journal.push(Event::AgentRevived {
                    agent: recipient,
                    medic: id,
                });
                self.issue_order(team, Order::new(OrderKind::Attack, cell));
            }
            Duty::Resupply => {
                let ammo = self.tuning.combat.max_ammo;
                let grenades = self.tuning.combat.max_grenades;
                self.agent_mut(recipient).refill(ammo, grenades);
                info!(provider = id.get(), agent = recipient.get(), "resupplied");
                self.journal.push(Event::Resupplied {
                    agent: recipient,
                    provider: id,
                });

                self.halt(recipient);
                let size = self.terrain.size();
                let logistics = &self.tuning.logistics;
                let enemy = team.opponent();
                let follow_up = if self.living_enemies(team).next().is_some() {
                    Order::new(
                        OrderKind::Attack,
                        enemy.territory_point(size, logistics.forward_inset),
                    )
                } else {
                    Order::new(
                        OrderKind::Move,
                        enemy.territory_point(size, logistics.fallback_move_inset),
                    )
                };
                self.receive_order(recipient, follow_up);
            }
        }
    }

    /// Self-initiated medic errand for a wounded warrior loitering near the depot.
    fn notice_wounded_near_depot(&mut self, id: AgentId) {
        let team = self.agent(id).team;
        let depot = self.depots_of(team).medical;
        let logistics = &self.tuning.logistics;
        let wounded = self
            .agents
            .iter()
            .find(|agent| {
                agent.team == team
                    && agent.role() == Role::Warrior
                    && agent.is_alive()
                    && agent.health < logistics.wounded_health
                    && agent.cell.manhattan_distance(depot) <= logistics.medic_depot_radius
            })
            .map(|agent| agent.id);

        if let Some(recipient) = wounded {
            debug!(medic = id.get(), agent = recipient.get(), "wounded warrior at depot");
            self.start_errand(id, recipient);
        }
    }

    fn start_errand(&mut self, id: AgentId, recipient: AgentId) {
        let recipient_cell = self.agent(recipient).cell;
        let Some(state) = self.agent_mut(id).logistics_mut() else {
            return;
        };
        state.recipient = Some(recipient);
        state.errand = Errand::ToStorage;
        state.last_known = recipient_cell;

        let storage = self.storage_of(id);
        if !self.move_to(id, storage) {
            self.abandon_errand(id);
        }
    }

    fn head_to_recipient(&mut self, id: AgentId, recipient: AgentId) {
        let cell = self.agent(recipient).cell;
        if let Some(state) = self.agent_mut(id).logistics_mut() {
            state.recipient = Some(recipient);
            state.errand = Errand::ToRecipient;
            state.last_known = cell;
        }
        if !self.move_to(id, cell) {
            self.abandon_errand(id);
        }
    }

    /// Replans toward the recipient's live position and restarts the cooldown.
    fn chase(&mut self, id: AgentId, recipient: AgentId) {
        let cooldown = self.tuning.logistics.replan_cooldown_frames;
        if let Some(state) = self.agent_mut(id).logistics_mut() {
            state.replan_cooldown = cooldown;
        }
        debug!(agent = id.get(), recipient = recipient.get(), "recipient drifted");
        self.head_to_recipient(id, recipient);
    }

    fn go_home(&mut self, id: AgentId) {
        let Some(state) = self.agent_mut(id).logistics_mut() else {
            return;
        };
        state.recipient = None;
        state.errand = Errand::Home;
        let home = state.home;
        if !self.move_to(id, home) {
            self.abandon_errand(id);
        }
    }

    fn abandon_errand(&mut self, id: AgentId) {
        if let Some(state) = self.agent_mut(id).logistics_mut() {
            state.reset();
        }
        self.halt(id);
        debug_assert_eq!(self.agent(id).state, StateKind::Idle);
    }

    fn storage_of(&self, id: AgentId) -> CellCoord {
        let agent = self.agent(id);
        let depots = self.depots_of(agent.team);
        match agent.logistics().map(|state| state.duty) {
            Some(Duty::Resupply) => depots.ammo,
            Some(Duty::Heal) | None => depots.medical,
        }
    }

    /// Nearest qualifying recipient to `anchor`, excluding the unit itself.
    fn pick_recipient(&self, id: AgentId, anchor: CellCoord) -> Option<AgentId> {
        let agent = self.agent(id);
        let duty = agent.logistics()?.duty;
        self.agents
            .iter()
            .filter(|other| other.team == agent.team && other.id != id)
            .filter(|other| match duty {
                Duty::Heal => !other.is_alive(),
                Duty::Resupply => {
                    other.role() == Role::Warrior && other.is_alive() && other.ammo == 0
                }
            })
            .min_by_key(|other| (other.cell.manhattan_distance(anchor), other.id))
            .map(|other| other.id)
    }

    fn nearest_wounded(&self, id: AgentId) -> Option<AgentId> {
        let agent = self.agent(id);
        let threshold = self.tuning.logistics.wounded_health;
        self.agents
            .iter()
            .filter(|other| {
                other.team == agent.team
                    && other.id != id
                    && other.is_alive()
                    && other.health < threshold
            })
            .min_by_key(|other| (other.cell.manhattan_distance(agent.cell), other.id))
            .map(|other| other.id)
    }

    /// Whether `recipient` still needs what this duty delivers.
    fn still_eligible(&self, duty: Duty, recipient: AgentId) -> bool {
        let agent = self.agent(recipient);
        match duty {
            Duty::Heal => agent.health < MAX_HEALTH,
            Duty::Resupply => agent.is_alive(),
        }
    }
}
