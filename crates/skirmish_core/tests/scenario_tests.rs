//! End-to-end scenario tests driven entirely through the public command
//! surface: submit commands, tick, inspect snapshots and events.

use skirmish_core::prelude::*;

fn at(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
}

/// 100ms ticks so build timers elapse in a handful of ticks.
fn fast_config() -> SimConfig {
    SimConfig {
        tick_interval_ms: 100,
        economy_interval_ms: 1000,
        unit_build_time_ms: 200,
        generator_build_time_ms: 500,
        house_build_time_ms: 700,
        ..SimConfig::default()
    }
}

fn tick_n(sim: &mut Simulation, n: usize) -> Vec<TickEvents> {
    (0..n).map(|_| sim.tick()).collect()
}

#[test]
fn train_commands_spend_energy_in_order_until_broke() {
    let mut sim = Simulation::new(fast_config());

    // 50 energy: a worker (10) and an attacker (20) fit, leaving 20.
    sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Worker });
    sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Attacker });
    let events = sim.tick();
    assert!(events.rejections.is_empty());
    assert_eq!(sim.economies().player.energy, 20);

    // A 30-cost purchase no longer fits; the balance is untouched by the
    // failed spend.
    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::House,
            position: at(200, 200),
        },
    );
    let events = sim.tick();
    assert_eq!(events.rejections.len(), 1);
    assert_eq!(
        events.rejections[0].reason,
        RejectReason::InsufficientEnergy {
            required: 30,
            available: 20
        }
    );
    assert_eq!(sim.economies().player.energy, 20);

    // An exact-cost spend still succeeds: the gate is `energy >= cost`.
    sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Attacker });
    let events = sim.tick();
    assert!(events.rejections.is_empty());
    assert_eq!(sim.economies().player.energy, 0);
}

#[test]
fn generator_completes_exactly_once() {
    let mut sim = Simulation::new(fast_config());
    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::Generator,
            position: at(200, 200),
        },
    );

    // 500ms of construction over 100ms ticks: completion on the fifth
    // tick after placement, and never again.
    let mut completions = 0;
    for events in tick_n(&mut sim, 20) {
        completions += events.completed_buildings.len();
    }
    assert_eq!(completions, 1);

    let generators = sim.entities().ids_by_kind(EntityKind::Generator);
    assert_eq!(generators.len(), 1);
    assert!(sim.get_entity(generators[0]).unwrap().is_built());
}

#[test]
fn house_completion_raises_cap_from_5_to_8() {
    let mut sim = Simulation::new(fast_config());
    assert_eq!(sim.economies().player.unit_cap, 5);

    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::House,
            position: at(150, 150),
        },
    );
    tick_n(&mut sim, 10);
    assert_eq!(sim.economies().player.unit_cap, 8);

    // Idempotence: ticking an already-built house changes nothing.
    let energy = sim.economies().player.energy;
    tick_n(&mut sim, 10);
    assert_eq!(sim.economies().player.unit_cap, 8);
    assert_eq!(sim.economies().player.energy, energy);
}

#[test]
fn two_hits_kill_a_ten_health_unit() {
    let mut sim = Simulation::new(fast_config());
    let attacker = sim.spawn_entity(EntityKind::Attacker, Faction::Player, at(0, 0));
    let victim = sim.spawn_entity(EntityKind::Worker, Faction::Enemy, at(60, 0));
    let enemy_live_before = sim.economies().enemy.live_units;

    // First pass: chase, hit for 5, target resets.
    sim.submit_command(
        Faction::Player,
        Command::Attack {
            units: vec![attacker],
            target: victim,
        },
    );
    let mut damage_events = 0;
    for _ in 0..60 {
        let events = sim.tick();
        damage_events += events.damage.len();
        if damage_events > 0 {
            break;
        }
    }
    assert_eq!(damage_events, 1);
    assert_eq!(sim.get_entity(victim).unwrap().health, 5);
    assert!(sim.get_entity(attacker).unwrap().target.is_none());

    // Second pass after re-targeting: the kill.
    sim.submit_command(
        Faction::Player,
        Command::Attack {
            units: vec![attacker],
            target: victim,
        },
    );
    let mut destroyed = Vec::new();
    for _ in 0..60 {
        let events = sim.tick();
        destroyed.extend(events.destroyed);
        if !destroyed.is_empty() {
            break;
        }
    }
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].id, victim);
    assert!(sim.get_entity(victim).is_none());
    assert_eq!(sim.economies().enemy.live_units, enemy_live_before - 1);
}

#[test]
fn unit_cap_rejects_all_training_at_the_cap() {
    let mut sim = Simulation::new(fast_config());
    for _ in 0..5 {
        sim.spawn_entity(EntityKind::Worker, Faction::Player, at(10, 10));
    }
    assert_eq!(sim.economies().player.live_units, 5);

    let energy = sim.economies().player.energy;
    for kind in [EntityKind::Worker, EntityKind::Attacker, EntityKind::Worker] {
        sim.submit_command(Faction::Player, Command::Train { kind });
    }
    let events = sim.tick();

    assert_eq!(events.rejections.len(), 3);
    for rejection in &events.rejections {
        assert_eq!(rejection.reason, RejectReason::UnitCapReached { cap: 5 });
    }
    // Cap rejections must never burn energy.
    assert_eq!(sim.economies().player.energy, energy);
    assert!(sim.pending_trains().is_empty());
}

#[test]
fn cap_holds_before_and_after_every_command() {
    let mut sim = Simulation::new(fast_config());
    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::House,
            position: at(150, 150),
        },
    );
    for _ in 0..8 {
        sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Worker });
    }

    for _ in 0..60 {
        let events = sim.tick();
        let player = events.snapshot.faction(Faction::Player).unwrap();
        assert!(
            player.live_units <= player.unit_cap,
            "live {} exceeded cap {} at tick {}",
            player.live_units,
            player.unit_cap,
            events.snapshot.tick
        );
    }
}

#[test]
fn move_then_attack_leaves_only_the_attack_target() {
    let mut sim = Simulation::new(fast_config());
    let unit = sim.spawn_entity(EntityKind::Attacker, Faction::Player, at(0, 0));
    let victim = sim.spawn_entity(EntityKind::Worker, Faction::Enemy, at(300, 300));

    sim.submit_command(
        Faction::Player,
        Command::Move {
            units: vec![unit],
            destination: at(500, 0),
        },
    );
    sim.submit_command(
        Faction::Player,
        Command::Attack {
            units: vec![unit],
            target: victim,
        },
    );
    sim.tick();

    assert_eq!(
        sim.get_entity(unit).unwrap().target,
        Some(Target::Entity(victim))
    );
}

#[test]
fn cancelled_train_never_spawns_and_refunds() {
    let mut sim = Simulation::new(fast_config());
    sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Attacker });
    sim.tick();
    assert_eq!(sim.economies().player.energy, 30);
    assert_eq!(sim.pending_trains().len(), 1);

    sim.submit_command(
        Faction::Player,
        Command::CancelTrain {
            kind: EntityKind::Attacker,
        },
    );
    let mut spawned = 0;
    for events in tick_n(&mut sim, 20) {
        spawned += events.spawned.len();
    }
    assert_eq!(spawned, 0);
    assert_eq!(sim.economies().player.energy, 50);
    assert_eq!(sim.economies().player.live_units, 0);
}

#[test]
fn dead_entities_leave_no_dangling_targets() {
    let mut sim = Simulation::new(fast_config());
    let victim = sim.spawn_entity(EntityKind::Worker, Faction::Enemy, at(40, 0));
    let hunters: Vec<_> = (0..3)
        .map(|i| sim.spawn_entity(EntityKind::Attacker, Faction::Player, at(0, i * 15)))
        .collect();

    sim.submit_command(
        Faction::Player,
        Command::Attack {
            units: hunters.clone(),
            target: victim,
        },
    );

    for _ in 0..120 {
        let events = sim.tick();
        // The moment the victim dies, no survivor may still reference it.
        if events.destroyed.iter().any(|d| d.id == victim) {
            for &hunter in &hunters {
                if let Some(entity) = sim.get_entity(hunter) {
                    assert_ne!(entity.target, Some(Target::Entity(victim)));
                }
            }
            return;
        }
    }
    panic!("victim was never destroyed");
}

#[test]
fn live_unit_ledger_matches_the_store() {
    let mut sim = Simulation::new(fast_config());
    let victim = sim.spawn_entity(EntityKind::Worker, Faction::Enemy, at(60, 0));
    let hunter = sim.spawn_entity(EntityKind::Attacker, Faction::Player, at(0, 0));
    sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Worker });
    sim.submit_command(
        Faction::Player,
        Command::Attack {
            units: vec![hunter],
            target: victim,
        },
    );

    for _ in 0..120 {
        sim.tick();
        for faction in [Faction::Player, Faction::Enemy] {
            let counted = sim
                .entities()
                .ids_by_faction(faction)
                .into_iter()
                .filter_map(|id| sim.get_entity(id))
                .filter(|e| e.kind.is_unit())
                .count() as u32;
            assert_eq!(
                sim.economies().get(faction).unwrap().live_units,
                counted,
                "{faction:?} ledger out of sync at tick {}",
                sim.current_tick()
            );
        }
    }
}

#[test]
fn snapshots_report_construction_progress_monotonically() {
    let mut sim = Simulation::new(fast_config());
    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::Generator,
            position: at(250, 250),
        },
    );

    let mut last_percent = 0;
    for events in tick_n(&mut sim, 10) {
        let Some(view) = events
            .snapshot
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Generator)
        else {
            continue;
        };
        let progress = view.build_progress.expect("buildings expose progress");
        assert!(progress.percent >= last_percent, "progress went backwards");
        last_percent = progress.percent;
    }
    assert_eq!(last_percent, 100);
}
