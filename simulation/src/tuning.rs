//! Tunable constants consumed by the simulation.
//!
//! Every group deserializes with per-field defaults so a configuration file
//! only needs to name the values it overrides.

use serde::Deserialize;

/// Aggregated tuning knobs for a simulation run.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationTuning {
    /// Sight range of every agent.
    pub perception: PerceptionTuning,
    /// Pace of path following.
    pub movement: MovementTuning,
    /// Weapons, loadouts and retreat rules.
    pub combat: CombatTuning,
    /// Commander schedule, policy and support rules.
    pub command: CommandTuning,
    /// Medic and provider errands.
    pub logistics: LogisticsTuning,
    /// Transient tracer and blast effects.
    pub effects: EffectTuning,
}

/// Visibility parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PerceptionTuning {
    /// Euclidean sight radius in cells.
    pub sight_radius: u32,
}

impl Default for PerceptionTuning {
    fn default() -> Self {
        Self { sight_radius: 12 }
    }
}

/// Path following parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Frames an agent waits between consecutive path cells.
    pub delay_frames: u32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self { delay_frames: 80 }
    }
}

/// Weapon and loadout parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Manhattan range of rifles.
    pub weapon_range: u32,
    /// Damage dealt by one shot.
    pub shot_damage: u32,
    /// Ammunition consumed by one shot.
    pub shot_ammo_cost: u32,
    /// Frames between shots.
    pub fire_cooldown_frames: u32,
    /// Damage dealt to every enemy caught in a blast.
    pub grenade_damage: u32,
    /// Manhattan radius of a grenade blast around its target.
    pub grenade_blast_radius: u32,
    /// Manhattan radius around the thrower scanned for grouped enemies.
    pub grenade_trigger_radius: u32,
    /// Enemies required inside the trigger radius before throwing.
    pub grenade_trigger_count: usize,
    /// Frames before the thrower may fire again.
    pub grenade_cooldown_frames: u32,
    /// Ammunition capacity.
    pub max_ammo: u32,
    /// Grenade capacity of warriors.
    pub max_grenades: u32,
    /// Warriors below this health fall back to the medical depot.
    pub retreat_health: u32,
    /// Maximum per-axis offset of a retreat destination from its depot.
    pub retreat_jitter: i32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            weapon_range: 8,
            shot_damage: 12,
            shot_ammo_cost: 2,
            fire_cooldown_frames: 75,
            grenade_damage: 15,
            grenade_blast_radius: 3,
            grenade_trigger_radius: 6,
            grenade_trigger_count: 2,
            grenade_cooldown_frames: 150,
            max_ammo: 4,
            max_grenades: 3,
            retreat_health: 50,
            retreat_jitter: 2,
        }
    }
}

/// Commander parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandTuning {
    /// Frames before the first strategic decision may be taken.
    pub warmup_frames: u64,
    /// Frames between strategic decisions.
    pub interval_frames: u64,
    /// Relative likelihood of launching an attack.
    pub attack_weight: u32,
    /// Relative likelihood of ordering a defence.
    pub defend_weight: u32,
    /// Relative likelihood of holding.
    pub hold_weight: u32,
    /// Distance of the opening and assault points from the enemy's corner.
    pub assault_inset: i32,
    /// Maximum per-axis offset applied to assault points.
    pub attack_jitter: i32,
    /// Distance of the defence point from the friendly corner.
    pub defend_inset: i32,
    /// Maximum per-axis offset applied to defence points.
    pub defend_jitter: i32,
    /// Distance of the final rally point from the enemy's corner.
    pub final_rally_inset: i32,
    /// Danger at the commander's cell that makes it look for cover.
    pub relocation_danger: u8,
    /// Largest ring searched for a cover cell.
    pub relocation_radius: i32,
    /// Warriors at or below this ammunition are candidates for resupply.
    pub resupply_ammo_threshold: u32,
    /// Maximum Manhattan distance from the ammo depot for a resupply request.
    pub resupply_depot_radius: u32,
    /// Frames between two resupply requests.
    pub resupply_request_interval: u64,
}

impl Default for CommandTuning {
    fn default() -> Self {
        Self {
            warmup_frames: 180,
            interval_frames: 600,
            attack_weight: 2,
            defend_weight: 1,
            hold_weight: 1,
            assault_inset: 10,
            attack_jitter: 3,
            defend_inset: 8,
            defend_jitter: 2,
            final_rally_inset: 8,
            relocation_danger: 8,
            relocation_radius: 5,
            resupply_ammo_threshold: 2,
            resupply_depot_radius: 8,
            resupply_request_interval: 60,
        }
    }
}

/// Medic and provider parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogisticsTuning {
    /// Teammates below this health count as wounded.
    pub wounded_health: u32,
    /// Radius around the medical depot in which a medic notices wounded warriors.
    pub medic_depot_radius: u32,
    /// Distance a recipient must drift before the route is replanned.
    pub drift_threshold: u32,
    /// Frames between two drift replans.
    pub replan_cooldown_frames: u32,
    /// Distance from the enemy corner of the attack point given to restocked warriors.
    pub forward_inset: i32,
    /// Distance from the enemy corner of the move point used once no enemy remains.
    pub fallback_move_inset: i32,
}

impl Default for LogisticsTuning {
    fn default() -> Self {
        Self {
            wounded_health: 50,
            medic_depot_radius: 3,
            drift_threshold: 2,
            replan_cooldown_frames: 60,
            forward_inset: 8,
            fallback_move_inset: 5,
        }
    }
}

/// Effect pool parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// Frames an effect survives.
    pub lifetime_frames: u32,
    /// Cells travelled by a tracer, or grown by a blast, per frame.
    pub speed: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            lifetime_frames: 40,
            speed: 0.1,
        }
    }
}
