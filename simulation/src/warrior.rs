//! Warrior combat: retreat rules, target selection, rifle fire and grenades.

use skirmish_core::{AgentId, Event, Role, StateKind};
use tracing::{debug, info, trace};

use crate::{
    agent::{CombatMode, Routing},
    Simulation,
};

impl Simulation {
    /// Per-tick warrior logic, run after movement.
    pub(crate) fn warrior_tick(&mut self, id: AgentId) {
        let Some(warrior) = self.agent_mut(id).warrior_mut() else {
            return;
        };
        warrior.fire_cooldown = warrior.fire_cooldown.saturating_sub(1);
        let mode = warrior.mode;

        let agent = self.agent(id);
        if agent.ammo == 0 || agent.health < self.tuning.combat.retreat_health {
            self.retreat(id);
            return;
        }

        match mode {
            CombatMode::None => {}
            CombatMode::Attacking => self.attack(id),
            CombatMode::Defending => self.defend(id),
        }
    }

    /// Abandons the mission and heads for a cell near the relevant depot.
    ///
    /// Dry warriors fall back on the ammo depot, wounded ones on the medical
    /// depot. A blocked jittered cell falls back to the depot itself. The
    /// way back takes the shortest path, whatever the danger along it.
    fn retreat(&mut self, id: AgentId) {
        let agent = self.agent(id);
        let depots = self.depots_of(agent.team);
        let depot = if agent.ammo == 0 {
            depots.ammo
        } else {
            depots.medical
        };

        let jitter = self.tuning.combat.retreat_jitter;
        self.halt(id);
        let candidate = self.jittered(depot, jitter);
        let goal = if self.terrain.passable(candidate) {
            candidate
        } else {
            depot
        };
        trace!(agent = id.get(), ?goal, "retreating");
        let _ = self.move_with(id, goal, Routing::Direct);
    }

    fn attack(&mut self, id: AgentId) {
        let range = self.tuning.combat.weapon_range;
        let cell = self.agent(id).cell;

        if let Some(target) = self.select_target(id, true) {
            if self.agent(target).cell.manhattan_distance(cell) <= range {
                self.halt(id);
                self.engage(id, target);
                return;
            }
        }

        let Some(quarry) = self.select_target(id, false) else {
            return;
        };
        let destination = self.agent(quarry).cell;
        if self.agent(id).route.destination() == Some(destination) {
            return;
        }
        let _ = self.move_to(id, destination);
    }

    fn defend(&mut self, id: AgentId) {
        let range = self.tuning.combat.weapon_range;
        let agent = self.agent(id);
        let cell = agent.cell;
        let visible = self
            .living_enemies(agent.team)
            .filter(|enemy| agent.visibility.is_visible(enemy.cell))
            .min_by_key(|enemy| (enemy.cell.manhattan_distance(cell), enemy.id))
            .map(|enemy| (enemy.id, enemy.cell));

        if let Some((target, target_cell)) = visible {
            if target_cell.manhattan_distance(cell) <= range
                && self.terrain.line_of_sight(cell, target_cell)
            {
                self.engage(id, target);
            }
        }
    }

    /// Picks the nearest living enemy, preferring warriors while any remain.
    ///
    /// With `require_sight` only candidates in clear line of sight qualify.
    fn select_target(&self, id: AgentId, require_sight: bool) -> Option<AgentId> {
        let agent = self.agent(id);
        let cell = agent.cell;
        let warriors_remain = self
            .living_enemies(agent.team)
            .any(|enemy| enemy.role() == Role::Warrior);

        self.living_enemies(agent.team)
            .filter(|enemy| !warriors_remain || enemy.role() == Role::Warrior)
            .filter(|enemy| !require_sight || self.terrain.line_of_sight(cell, enemy.cell))
            .min_by_key(|enemy| (enemy.cell.manhattan_distance(cell), enemy.id))
            .map(|enemy| enemy.id)
    }

    /// Throws a grenade when targets crowd in, otherwise fires a single shot
    /// at `target`.
    ///
    /// Only the targets [`Self::select_target`] would consider count toward
    /// the crowd: enemy warriors while any stand, every living enemy after.
    fn engage(&mut self, id: AgentId, target: AgentId) {
        let combat = &self.tuning.combat;
        let agent = self.agent(id);
        if agent.warrior().map_or(true, |warrior| warrior.fire_cooldown > 0) {
            return;
        }

        let cell = agent.cell;
        let warriors_remain = self
            .living_enemies(agent.team)
            .any(|enemy| enemy.role() == Role::Warrior);
        let crowding = self
            .living_enemies(agent.team)
            .filter(|enemy| !warriors_remain || enemy.role() == Role::Warrior)
            .filter(|enemy| enemy.cell.manhattan_distance(cell) <= combat.grenade_trigger_radius)
            .count();

        if agent.grenades > 0 && crowding >= combat.grenade_trigger_count {
            self.throw_grenade(id);
        } else if agent.ammo > 0 {
            self.fire_shot(id, target);
        }
    }

    /// Fires at the nearest enemy in range and sight, ignoring combat mode.
    pub(crate) fn try_direct_attack(&mut self, id: AgentId) {
        let range = self.tuning.combat.weapon_range;
        let agent = self.agent(id);
        if !agent.is_alive() || agent.ammo == 0 {
            return;
        }
        if agent.warrior().map_or(true, |warrior| warrior.fire_cooldown > 0) {
            return;
        }

        let cell = agent.cell;
        let target = self
            .living_enemies(agent.team)
            .filter(|enemy| enemy.cell.manhattan_distance(cell) <= range)
            .filter(|enemy| self.terrain.line_of_sight(cell, enemy.cell))
            .min_by_key(|enemy| (enemy.cell.manhattan_distance(cell), enemy.id))
            .map(|enemy| enemy.id);

        if let Some(target) = target {
            self.fire_shot(id, target);
        }
    }

    fn fire_shot(&mut self, id: AgentId, target: AgentId) {
        let damage = self.tuning.combat.shot_damage;
        let cost = self.tuning.combat.shot_ammo_cost;
        let cooldown = self.tuning.combat.fire_cooldown_frames;

        let shooter = self.agent_mut(id);
        shooter.spend_ammo(cost);
        if let Some(warrior) = shooter.warrior_mut() {
            warrior.fire_cooldown = cooldown;
        }
        let from = shooter.cell;
        let to = self.agent(target).cell;

        self.effects.spawn_tracer(&self.tuning.effects, from, to);
        self.journal.push(Event::ShotFired {
            shooter: id,
            target,
            damage,
        });
        trace!(shooter = id.get(), target = target.get(), "shot fired");
        self.apply_damage(target, damage);
    }

    /// Detonates around the thrower's own cell, catching every living enemy
    /// within the blast radius.
    fn throw_grenade(&mut self, id: AgentId) {
        let damage = self.tuning.combat.grenade_damage;
        let radius = self.tuning.combat.grenade_blast_radius;
        let cooldown = self.tuning.combat.grenade_cooldown_frames;

        let thrower = self.agent_mut(id);
        thrower.grenades = thrower.grenades.saturating_sub(1);
        if let Some(warrior) = thrower.warrior_mut() {
            warrior.fire_cooldown = cooldown;
        }
        let team = thrower.team;
        let center = thrower.cell;

        let caught: Vec<AgentId> = self
            .living_enemies(team)
            .filter(|enemy| enemy.cell.manhattan_distance(center) <= radius)
            .map(|enemy| enemy.id)
            .collect();
        for victim in &caught {
            self.apply_damage(*victim, damage);
        }

        self.effects.spawn_blast(&self.tuning.effects, center, radius);
        let hits = u32::try_from(caught.len()).unwrap_or(u32::MAX);
        debug!(thrower = id.get(), ?center, hits, "grenade thrown");
        self.journal.push(Event::GrenadeThrown {
            thrower: id,
            center,
            hits,
        });
    }

    /// Applies damage and reports the agent going down.
    pub(crate) fn apply_damage(&mut self, id: AgentId, amount: u32) {
        if self.agent_mut(id).take_damage(amount) {
            info!(agent = id.get(), frame = self.frame, "agent down");
            self.journal.push(Event::AgentDowned { agent: id });
        }
        debug_assert!(
            self.agent(id).is_alive() || self.agent(id).state == StateKind::Idle,
            "down agents never keep a state"
        );
    }
}
