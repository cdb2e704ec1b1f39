//! Hand-built battlefield scenarios exercising whole frames.

use skirmish_core::{
    AgentId, CellCoord, CellKind, Event, GameOutcome, Order, OrderKind, Role, StateKind, Team,
};
use skirmish_world::{Battlefield, Deployment, TeamDepots, TerrainGrid};

use skirmish_system_pathfinding::find_path;

use crate::{
    advance,
    agent::{CombatMode, Errand},
    orders::OrderQueue,
    query, Simulation, SimulationTuning,
};

fn quiet_tuning() -> SimulationTuning {
    let mut tuning = SimulationTuning::default();
    tuning.movement.delay_frames = 0;
    tuning.command.warmup_frames = u64::MAX;
    tuning
}

fn build(
    size: u32,
    rocks: &[CellCoord],
    roster: &[(Team, Role, CellCoord)],
    tuning: SimulationTuning,
) -> Simulation {
    let mut terrain = TerrainGrid::new(size);
    for rock in rocks {
        terrain.set(*rock, CellKind::Rock);
    }
    let far = size as i32 - 2;
    let depots = [
        TeamDepots {
            ammo: CellCoord::new(1, 1),
            medical: CellCoord::new(1, 3),
        },
        TeamDepots {
            ammo: CellCoord::new(far, far),
            medical: CellCoord::new(far, far - 2),
        },
    ];
    let deployments = roster
        .iter()
        .map(|(team, role, cell)| Deployment {
            team: *team,
            role: *role,
            cell: *cell,
        })
        .collect();

    let mut simulation = Simulation::new(
        Battlefield {
            terrain,
            depots,
            deployments,
        },
        tuning,
        7,
    )
    .expect("valid battlefield");
    for agent in &mut simulation.agents {
        if let Some(state) = agent.commander_mut() {
            state.orders = OrderQueue::default();
        }
    }
    simulation.journal.clear();
    simulation
}

fn step(simulation: &mut Simulation) -> Vec<Event> {
    let mut events = Vec::new();
    advance(simulation, &mut events);
    events
}

fn id(index: u32) -> AgentId {
    AgentId::new(index)
}

fn shots(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ShotFired { .. }))
        .count()
}

#[test]
fn dry_warrior_retreats_toward_its_ammo_depot() {
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Warrior, CellCoord::new(10, 10)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        quiet_tuning(),
    );
    let warrior = simulation.agent_mut(id(0));
    warrior.ammo = 0;
    warrior.health = 80;

    let events = step(&mut simulation);

    let snapshot = query::agent(&simulation, id(0)).expect("warrior");
    let depot = query::depots(&simulation, Team::Orange).ammo;
    assert_eq!(snapshot.state, StateKind::MoveToTarget);
    assert!(snapshot.moving);
    assert!(snapshot.target.manhattan_distance(depot) <= 4);
    assert_ne!(snapshot.target, CellCoord::new(18, 18));
    assert_eq!(
        simulation.agent(id(0)).route.destination(),
        Some(snapshot.target)
    );
    assert_eq!(shots(&events), 0);
}

#[test]
fn wounded_warrior_falls_back_on_the_medical_depot() {
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 0;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Warrior, CellCoord::new(10, 10)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        tuning,
    );
    simulation.agent_mut(id(0)).health = 30;

    let _ = step(&mut simulation);

    let snapshot = query::agent(&simulation, id(0)).expect("warrior");
    assert_eq!(snapshot.target, query::depots(&simulation, Team::Orange).medical);
}

#[test]
fn heal_order_without_a_down_teammate_leaves_the_medic_idle() {
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 2)),
            (Team::Orange, Role::Medic, CellCoord::new(4, 4)),
            (Team::Orange, Role::Warrior, CellCoord::new(6, 6)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        quiet_tuning(),
    );
    simulation.issue_order(Team::Orange, Order::new(OrderKind::Heal, CellCoord::new(6, 6)));

    let events = step(&mut simulation);

    let medic = query::agent(&simulation, id(1)).expect("medic");
    assert_eq!(medic.state, StateKind::Idle);
    assert!(!medic.moving);
    assert_eq!(medic.cell, CellCoord::new(4, 4));
    assert!(events.contains(&Event::OrderDispatched {
        team: Team::Orange,
        order: Order::new(OrderKind::Heal, CellCoord::new(6, 6)),
        recipients: 1,
    }));
}

#[test]
fn medic_revives_a_down_teammate() {
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 10)),
            (Team::Orange, Role::Medic, CellCoord::new(3, 3)),
            (Team::Orange, Role::Warrior, CellCoord::new(5, 5)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        quiet_tuning(),
    );
    let _ = simulation.agent_mut(id(2)).take_damage(500);

    let first = step(&mut simulation);
    assert!(first.iter().any(|event| matches!(
        event,
        Event::OrderIssued {
            team: Team::Orange,
            order,
        } if order.kind() == OrderKind::Heal
    )));

    let mut revived = false;
    for _ in 0..40 {
        let events = step(&mut simulation);
        if events.contains(&Event::AgentRevived {
            agent: id(2),
            medic: id(1),
        }) {
            revived = true;
            break;
        }
    }

    assert!(revived, "medic never reached the patient");
    let patient = query::agent(&simulation, id(2)).expect("warrior");
    assert!(patient.alive);
    assert_eq!(patient.health, 100);
}

#[test]
fn provider_restocks_a_dry_warrior_on_its_way_back() {
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 0;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 12)),
            (Team::Orange, Role::Provider, CellCoord::new(4, 4)),
            (Team::Orange, Role::Warrior, CellCoord::new(1, 9)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        tuning,
    );
    simulation.agent_mut(id(2)).ammo = 0;

    let mut restocked = false;
    for _ in 0..80 {
        let events = step(&mut simulation);
        if events.contains(&Event::Resupplied {
            agent: id(2),
            provider: id(1),
        }) {
            restocked = true;
            break;
        }
    }

    assert!(restocked, "provider never delivered");
    let warrior = query::agent(&simulation, id(2)).expect("warrior");
    assert_eq!(warrior.ammo, 4);
    assert_eq!(warrior.grenades, 3);
    assert_eq!(
        simulation.agent(id(2)).warrior().map(|state| state.mode),
        Some(CombatMode::Attacking)
    );
}

#[test]
fn provider_finding_its_recipient_on_the_depot_stands_down() {
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 0;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 12)),
            (Team::Orange, Role::Provider, CellCoord::new(4, 4)),
            (Team::Orange, Role::Warrior, CellCoord::new(1, 2)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        tuning,
    );
    simulation.agent_mut(id(2)).ammo = 0;
    let depot = query::depots(&simulation, Team::Orange).ammo;

    let mut requested = false;
    for _ in 0..50 {
        let events = step(&mut simulation);
        requested |= events.iter().any(|event| matches!(
            event,
            Event::OrderDispatched { order, recipients: 1, .. } if order.kind() == OrderKind::Resupply
        ));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::Resupplied { .. })));
    }

    assert!(requested, "commander never asked for a resupply");
    let provider = simulation.agent(id(1));
    assert_eq!(provider.cell, depot);
    assert_eq!(provider.state, StateKind::Idle);
    assert_eq!(
        provider.logistics().map(|state| (state.errand, state.recipient)),
        Some((Errand::Idle, None))
    );
    let warrior = query::agent(&simulation, id(2)).expect("warrior");
    assert_eq!(warrior.cell, depot);
    assert_eq!(warrior.ammo, 0);
}

#[test]
fn provider_replans_when_its_recipient_drifts() {
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 0;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Provider, CellCoord::new(10, 2)),
            (Team::Orange, Role::Warrior, CellCoord::new(10, 10)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        tuning,
    );
    simulation.agent_mut(id(1)).ammo = 0;
    let stale = CellCoord::new(10, 12);
    if let Some(state) = simulation.agent_mut(id(0)).logistics_mut() {
        state.recipient = Some(id(1));
        state.errand = Errand::ToRecipient;
        state.last_known = stale;
    }
    assert!(simulation.move_to(id(0), stale));

    let _ = step(&mut simulation);

    let provider = simulation.agent(id(0));
    assert_eq!(provider.cell, CellCoord::new(10, 3));
    assert_eq!(provider.target, CellCoord::new(10, 10));
    let state = provider.logistics().expect("provider");
    assert_eq!(state.errand, Errand::ToRecipient);
    assert_eq!(state.last_known, CellCoord::new(10, 10));
    assert_eq!(state.replan_cooldown, 60);

    // A second drift inside the cooldown keeps the current route.
    if let Some(state) = simulation.agent_mut(id(0)).logistics_mut() {
        state.last_known = CellCoord::new(14, 10);
    }
    let _ = step(&mut simulation);

    let provider = simulation.agent(id(0));
    assert_eq!(provider.target, CellCoord::new(10, 10));
    assert_eq!(provider.logistics().map(|state| state.replan_cooldown), Some(59));
}

#[test]
fn idle_medic_tends_a_wounded_warrior_by_the_depot() {
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 0;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Medic, CellCoord::new(4, 4)),
            (Team::Orange, Role::Warrior, CellCoord::new(2, 3)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        tuning,
    );
    simulation.agent_mut(id(1)).health = 40;
    let depot = query::depots(&simulation, Team::Orange).medical;

    let _ = step(&mut simulation);

    let medic = simulation.agent(id(0));
    assert_eq!(medic.state, StateKind::MoveToTarget);
    assert_eq!(medic.target, depot);
    assert_eq!(
        medic.logistics().map(|state| (state.errand, state.recipient)),
        Some((Errand::ToStorage, Some(id(1))))
    );

    let mut healed = false;
    for _ in 0..30 {
        let events = step(&mut simulation);
        if events.contains(&Event::AgentRevived {
            agent: id(1),
            medic: id(0),
        }) {
            healed = true;
            break;
        }
    }

    assert!(healed, "medic never treated the warrior");
    assert_eq!(query::agent(&simulation, id(1)).expect("warrior").health, 100);
}

#[test]
fn idle_medic_ignores_wounded_warriors_away_from_the_depot() {
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Medic, CellCoord::new(4, 4)),
            (Team::Orange, Role::Warrior, CellCoord::new(12, 12)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        quiet_tuning(),
    );
    simulation.agent_mut(id(1)).health = 40;

    let _ = step(&mut simulation);

    let medic = simulation.agent(id(0));
    assert_eq!(medic.state, StateKind::Idle);
    assert_eq!(medic.logistics().map(|state| state.errand), Some(Errand::Idle));
}

#[test]
fn orders_reach_only_compatible_roles() {
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 2)),
            (Team::Orange, Role::Warrior, CellCoord::new(3, 3)),
            (Team::Orange, Role::Medic, CellCoord::new(4, 4)),
            (Team::Orange, Role::Provider, CellCoord::new(5, 5)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        quiet_tuning(),
    );
    let order = Order::new(OrderKind::Defend, CellCoord::new(10, 10));
    simulation.issue_order(Team::Orange, order);

    let events = step(&mut simulation);

    assert!(events.contains(&Event::OrderDispatched {
        team: Team::Orange,
        order,
        recipients: 1,
    }));
    let warrior = query::agent(&simulation, id(1)).expect("warrior");
    assert_eq!(warrior.state, StateKind::MoveToTarget);
    assert_eq!(warrior.target, CellCoord::new(10, 10));
    for logistics in [id(2), id(3)] {
        let snapshot = query::agent(&simulation, logistics).expect("logistics");
        assert_eq!(snapshot.state, StateKind::Idle);
    }
    assert!(query::pending_orders(&simulation, Team::Orange).is_empty());
}

#[test]
fn leaderless_warriors_trade_shots_in_sight() {
    let mut simulation = build(
        12,
        &[],
        &[
            (Team::Orange, Role::Warrior, CellCoord::new(5, 2)),
            (Team::Blue, Role::Warrior, CellCoord::new(5, 7)),
        ],
        quiet_tuning(),
    );

    let events = step(&mut simulation);

    assert_eq!(shots(&events), 2);
    let orange = query::agent(&simulation, id(0)).expect("orange");
    let blue = query::agent(&simulation, id(1)).expect("blue");
    assert_eq!(blue.health, 88);
    assert_eq!(orange.health, 88);
    assert_eq!(orange.ammo, 2);
    assert_eq!(query::effects(&simulation).len(), 2);
}

#[test]
fn rock_blocks_the_line_of_fire() {
    let mut simulation = build(
        12,
        &[CellCoord::new(5, 4)],
        &[
            (Team::Orange, Role::Warrior, CellCoord::new(5, 2)),
            (Team::Blue, Role::Warrior, CellCoord::new(5, 7)),
        ],
        quiet_tuning(),
    );

    let events = step(&mut simulation);

    assert_eq!(shots(&events), 0);
}

fn grenadier_facing(blue: &[(Role, CellCoord)]) -> Simulation {
    let mut roster = vec![
        (Team::Orange, Role::Commander, CellCoord::new(2, 2)),
        (Team::Orange, Role::Warrior, CellCoord::new(10, 10)),
    ];
    roster.extend(blue.iter().map(|(role, cell)| (Team::Blue, *role, *cell)));
    let mut simulation = build(20, &[], &roster, quiet_tuning());
    if let Some(warrior) = simulation.agent_mut(id(1)).warrior_mut() {
        warrior.mode = CombatMode::Attacking;
    }
    simulation
}

#[test]
fn grenade_bursts_around_the_thrower() {
    let mut simulation = grenadier_facing(&[
        (Role::Warrior, CellCoord::new(10, 12)),
        (Role::Warrior, CellCoord::new(10, 13)),
    ]);

    let events = step(&mut simulation);

    assert!(events.contains(&Event::GrenadeThrown {
        thrower: id(1),
        center: CellCoord::new(10, 10),
        hits: 2,
    }));
    assert_eq!(shots(&events), 2);
    let thrower = query::agent(&simulation, id(1)).expect("thrower");
    assert_eq!(thrower.grenades, 2);
    assert_eq!(thrower.ammo, 4);
    assert_eq!(thrower.health, 76);
    assert_eq!(thrower.state, StateKind::Idle);
    for victim in [id(2), id(3)] {
        assert_eq!(query::agent(&simulation, victim).expect("victim").health, 85);
    }
}

#[test]
fn grenade_thrown_at_a_loose_cluster_falls_short() {
    let mut simulation = grenadier_facing(&[
        (Role::Warrior, CellCoord::new(10, 14)),
        (Role::Warrior, CellCoord::new(10, 15)),
    ]);

    let events = step(&mut simulation);

    assert!(events.contains(&Event::GrenadeThrown {
        thrower: id(1),
        center: CellCoord::new(10, 10),
        hits: 0,
    }));
    for enemy in [id(2), id(3)] {
        assert_eq!(query::agent(&simulation, enemy).expect("enemy").health, 100);
    }
}

#[test]
fn support_units_do_not_crowd_a_standing_warrior() {
    let mut simulation = grenadier_facing(&[
        (Role::Medic, CellCoord::new(10, 11)),
        (Role::Warrior, CellCoord::new(10, 12)),
    ]);

    let events = step(&mut simulation);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::GrenadeThrown { .. })));
    assert!(events.contains(&Event::ShotFired {
        shooter: id(1),
        target: id(3),
        damage: 12,
    }));
    assert_eq!(query::agent(&simulation, id(1)).expect("thrower").grenades, 3);
    assert_eq!(query::agent(&simulation, id(2)).expect("medic").health, 100);
}

#[test]
fn commander_sends_everyone_after_the_last_support_units() {
    let mut tuning = quiet_tuning();
    tuning.command.warmup_frames = 0;
    tuning.command.interval_frames = 1;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 2)),
            (Team::Orange, Role::Warrior, CellCoord::new(3, 3)),
            (Team::Blue, Role::Medic, CellCoord::new(15, 15)),
            (Team::Blue, Role::Provider, CellCoord::new(16, 16)),
        ],
        tuning,
    );

    let events = step(&mut simulation);

    let issued: Vec<Order> = events
        .iter()
        .filter_map(|event| match event {
            Event::OrderIssued {
                team: Team::Orange,
                order,
            } => Some(*order),
            _ => None,
        })
        .collect();
    assert_eq!(
        issued,
        vec![
            Order::new(OrderKind::Attack, CellCoord::new(15, 15)),
            Order::new(OrderKind::Attack, CellCoord::new(16, 16)),
        ]
    );
    let warrior = query::agent(&simulation, id(1)).expect("warrior");
    assert_eq!(warrior.target, CellCoord::new(15, 15));
    assert_eq!(
        query::pending_orders(&simulation, Team::Orange),
        vec![Order::new(OrderKind::Attack, CellCoord::new(16, 16))]
    );
}

#[test]
fn commander_rallies_deep_once_no_enemy_stands() {
    let mut tuning = quiet_tuning();
    tuning.command.warmup_frames = 0;
    tuning.command.interval_frames = 1;
    let mut simulation = build(
        20,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(2, 2)),
            (Team::Orange, Role::Warrior, CellCoord::new(3, 3)),
            (Team::Blue, Role::Warrior, CellCoord::new(15, 15)),
        ],
        tuning,
    );
    let _ = simulation.agent_mut(id(2)).take_damage(500);

    let events = step(&mut simulation);

    let rally = Team::Blue.territory_point(20, 8);
    assert_eq!(rally, CellCoord::new(12, 12));
    assert!(events.contains(&Event::OrderIssued {
        team: Team::Orange,
        order: Order::new(OrderKind::Attack, rally),
    }));
    assert_eq!(query::agent(&simulation, id(1)).expect("warrior").target, rally);
    assert!(events.contains(&Event::GameOver {
        outcome: GameOutcome::victory(Team::Orange),
    }));
}

#[test]
fn retreat_takes_the_short_way_home_through_danger() {
    let mut rocks = Vec::new();
    for row in 2..=11 {
        for column in 2..=11 {
            rocks.push(CellCoord::new(row, column));
        }
    }
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 0;
    let start = CellCoord::new(12, 11);
    let mut simulation = build(
        14,
        &rocks,
        &[
            (Team::Orange, Role::Warrior, start),
            (Team::Blue, Role::Warrior, CellCoord::new(12, 1)),
        ],
        tuning,
    );
    simulation.agent_mut(id(0)).ammo = 0;

    let _ = step(&mut simulation);
    let depot = query::depots(&simulation, Team::Orange).ammo;
    let cautious = find_path(
        query::terrain(&simulation),
        start,
        depot,
        Some(query::danger(&simulation, Team::Orange)),
    )
    .expect("cautious route");
    assert_eq!(cautious.first(), Some(&CellCoord::new(12, 12)));

    let _ = step(&mut simulation);

    let warrior = query::agent(&simulation, id(0)).expect("warrior");
    assert_eq!(warrior.cell, CellCoord::new(12, 10));
    assert_eq!(warrior.target, depot);
}

#[test]
fn retreat_into_a_walled_depot_never_targets_rock() {
    let rocks = [
        CellCoord::new(0, 0),
        CellCoord::new(0, 1),
        CellCoord::new(0, 2),
        CellCoord::new(1, 0),
        CellCoord::new(2, 0),
        CellCoord::new(2, 1),
        CellCoord::new(2, 2),
    ];
    let mut tuning = quiet_tuning();
    tuning.combat.retreat_jitter = 1;
    let mut simulation = build(
        20,
        &rocks,
        &[
            (Team::Orange, Role::Warrior, CellCoord::new(5, 5)),
            (Team::Blue, Role::Warrior, CellCoord::new(18, 18)),
        ],
        tuning,
    );
    simulation.agent_mut(id(0)).ammo = 0;
    let depot = query::depots(&simulation, Team::Orange).ammo;
    let doorway = CellCoord::new(1, 2);

    let mut fell_back = false;
    for _ in 0..12 {
        let _ = step(&mut simulation);
        let warrior = simulation.agent(id(0));
        assert!(
            warrior.target == depot || warrior.target == doorway,
            "retreat aimed at {:?}",
            warrior.target
        );
        assert_eq!(warrior.state, StateKind::MoveToTarget);
        fell_back |= warrior.target == depot;
    }
    assert!(fell_back);
}

#[test]
fn commander_under_threat_heads_for_cover() {
    let wall: Vec<CellCoord> = (0..12).map(|row| CellCoord::new(row, 4)).collect();
    let mut simulation = build(
        12,
        &wall,
        &[
            (Team::Orange, Role::Commander, CellCoord::new(5, 2)),
            (Team::Blue, Role::Warrior, CellCoord::new(5, 6)),
        ],
        quiet_tuning(),
    );

    let events = step(&mut simulation);

    assert!(query::danger(&simulation, Team::Orange).value_at(CellCoord::new(5, 2)) >= 8);
    assert!(events.contains(&Event::CommanderRelocating {
        commander: id(0),
        destination: CellCoord::new(3, 3),
    }));
    let commander = query::agent(&simulation, id(0)).expect("commander");
    assert_eq!(commander.state, StateKind::MoveToTarget);
    assert_eq!(commander.target, CellCoord::new(3, 3));
}

#[test]
fn elimination_ends_the_battle() {
    let mut simulation = build(
        12,
        &[],
        &[
            (Team::Orange, Role::Warrior, CellCoord::new(5, 5)),
            (Team::Blue, Role::Warrior, CellCoord::new(5, 8)),
        ],
        quiet_tuning(),
    );
    simulation.agent_mut(id(1)).health = 12;

    let events = step(&mut simulation);

    assert!(events.contains(&Event::AgentDowned { agent: id(1) }));
    let outcome = GameOutcome::victory(Team::Orange);
    assert!(events.contains(&Event::GameOver { outcome }));
    assert_eq!(query::outcome(&simulation), Some(outcome));

    let after = step(&mut simulation);
    assert!(after.is_empty());
    assert_eq!(query::frame(&simulation), 2);
}

#[test]
fn movement_waits_out_the_delay_between_cells() {
    let mut tuning = quiet_tuning();
    tuning.movement.delay_frames = 2;
    let mut simulation = build(
        10,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(9, 0)),
            (Team::Orange, Role::Warrior, CellCoord::new(0, 0)),
            (Team::Blue, Role::Warrior, CellCoord::new(9, 9)),
        ],
        tuning,
    );
    simulation.issue_order(Team::Orange, Order::new(OrderKind::Move, CellCoord::new(0, 5)));

    let mut trail = Vec::new();
    for _ in 0..7 {
        let _ = step(&mut simulation);
        trail.push(query::agent(&simulation, id(1)).expect("warrior").cell.column());
    }

    assert_eq!(trail, vec![1, 1, 1, 2, 2, 2, 3]);
}

#[test]
fn down_commander_shares_no_visibility() {
    let mut simulation = build(
        12,
        &[],
        &[
            (Team::Orange, Role::Commander, CellCoord::new(1, 8)),
            (Team::Orange, Role::Warrior, CellCoord::new(2, 2)),
            (Team::Blue, Role::Warrior, CellCoord::new(10, 10)),
        ],
        quiet_tuning(),
    );

    let _ = step(&mut simulation);
    let own = query::visibility(&simulation, id(1)).expect("warrior");
    let combined = query::team_visibility(&simulation, Team::Orange).expect("commander");
    assert!(own.is_visible(CellCoord::new(2, 2)));
    assert!(combined.count() >= own.count());
    assert!(combined.is_visible(CellCoord::new(2, 2)));
    assert!(combined.is_visible(CellCoord::new(1, 8)));

    let _ = simulation.agent_mut(id(0)).take_damage(500);
    let _ = step(&mut simulation);
    let combined = query::team_visibility(&simulation, Team::Orange).expect("commander");
    assert_eq!(combined.count(), 0);
}

#[test]
fn setup_rejects_blocked_and_duplicate_deployments() {
    let depots = [
        TeamDepots {
            ammo: CellCoord::new(1, 1),
            medical: CellCoord::new(1, 3),
        },
        TeamDepots {
            ammo: CellCoord::new(8, 8),
            medical: CellCoord::new(8, 6),
        },
    ];
    let terrain = TerrainGrid::from_rows(&[
        "..........",
        "..........",
        "....#.....",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
    ])
    .expect("grid");
    let deploy = |role, row, column| Deployment {
        team: Team::Orange,
        role,
        cell: CellCoord::new(row, column),
    };

    let blocked = Simulation::new(
        Battlefield {
            terrain: terrain.clone(),
            depots,
            deployments: vec![deploy(Role::Warrior, 2, 4)],
        },
        SimulationTuning::default(),
        0,
    );
    assert!(matches!(
        blocked,
        Err(crate::SetupError::DeploymentBlocked { index: 0, .. })
    ));

    let doubled = Simulation::new(
        Battlefield {
            terrain: terrain.clone(),
            depots,
            deployments: vec![deploy(Role::Commander, 0, 0), deploy(Role::Commander, 0, 1)],
        },
        SimulationTuning::default(),
        0,
    );
    assert!(matches!(
        doubled,
        Err(crate::SetupError::DuplicateCommander { count: 2, .. })
    ));

    let mut stray = depots;
    stray[1].ammo = CellCoord::new(10, 10);
    let off_board = Simulation::new(
        Battlefield {
            terrain,
            depots: stray,
            deployments: Vec::new(),
        },
        SimulationTuning::default(),
        0,
    );
    assert!(matches!(
        off_board,
        Err(crate::SetupError::DepotOffBoard {
            team: Team::Blue,
            ..
        })
    ));
}
