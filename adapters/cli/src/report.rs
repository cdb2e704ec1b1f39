//! Plain-text summaries printed by the CLI.

use std::fmt;

use skirmish_core::{AgentSnapshot, Event, Team};

/// Per-team head count taken from a roster snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TeamSummary {
    pub(crate) team: Team,
    pub(crate) standing: usize,
    pub(crate) down: usize,
    pub(crate) ammo: u32,
}

impl TeamSummary {
    pub(crate) fn collect(agents: &[AgentSnapshot]) -> Vec<Self> {
        Team::ALL
            .into_iter()
            .map(|team| {
                let members = agents.iter().filter(|agent| agent.team == team);
                let mut summary = Self {
                    team,
                    standing: 0,
                    down: 0,
                    ammo: 0,
                };
                for agent in members {
                    if agent.alive {
                        summary.standing += 1;
                        summary.ammo += agent.ammo;
                    } else {
                        summary.down += 1;
                    }
                }
                summary
            })
            .collect()
    }
}

impl fmt::Display for TeamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} standing {:>2}  down {:>2}  ammo {:>3}",
            self.team.name(),
            self.standing,
            self.down,
            self.ammo
        )
    }
}

/// Running count of notable events over a whole battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BattleTally {
    shots: u32,
    grenades: u32,
    downs: u32,
    revivals: u32,
    resupplies: u32,
    orders: u32,
}

impl BattleTally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ShotFired { .. } => self.shots += 1,
                Event::GrenadeThrown { .. } => self.grenades += 1,
                Event::AgentDowned { .. } => self.downs += 1,
                Event::AgentRevived { .. } => self.revivals += 1,
                Event::Resupplied { .. } => self.resupplies += 1,
                Event::OrderDispatched { .. } => self.orders += 1,
                Event::OrderIssued { .. }
                | Event::CommanderRelocating { .. }
                | Event::GameOver { .. } => {}
            }
        }
    }
}

impl fmt::Display for BattleTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shots {} | grenades {} | downs {} | revivals {} | resupplies {} | orders {}",
            self.shots, self.grenades, self.downs, self.revivals, self.resupplies, self.orders
        )
    }
}
