use combat_core::{Aim, AttackRequest, CombatState, OwnerId};
use data_runtime::configs::damage::DamageModelCfg;
use data_runtime::specs::weapons::{DamageMode, WeaponKind, WeaponSpec, WeaponSpecDb};
use glam::vec3;
use std::collections::HashMap;

fn sure_hit_model() -> DamageModelCfg {
    DamageModelCfg {
        base_hit_chance: 1.0,
        hit_chance_min: 1.0,
        hit_chance_max: 1.0,
        crit_base: 0.0,
        crit_stat_scale: 0.0,
        ..DamageModelCfg::default()
    }
}

/// A non-piercing round stops on the first body it touches no matter the
/// damage mode; target-only gates the application, never the flight.
#[test]
fn bystander_blocks_flight_but_takes_no_damage_in_target_only_mode() {
    let mut weapons = HashMap::new();
    weapons.insert(
        "bolt".to_string(),
        WeaponSpec {
            kind: WeaponKind::Projectile,
            range_m: 30.0,
            speed_mps: 20.0,
            damage: 15.0,
            pierce: false,
            damage_mode: DamageMode::TargetOnly,
            ..WeaponSpec::default()
        },
    );
    let mut s = CombatState::with_catalog(WeaponSpecDb::from_records(weapons), sure_hit_model(), 6);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let bystander = s.spawn_creature(vec3(5.0, 0.0, 0.0), 0.5, 50);
    let locked = s.spawn_creature(vec3(10.0, 0.0, 0.0), 0.5, 50);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "bolt".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Target(locked),
        hit_location: None,
    });
    for _ in 0..10 {
        s.step_authoritative(0.1);
    }

    assert!(s.projectiles.is_empty(), "round must stop on first contact");
    assert!(s.drain_outcomes().is_empty(), "no damage to anyone");
    assert_eq!(s.ecs.get(bystander).unwrap().hp.hp, 50);
    assert_eq!(s.ecs.get(locked).unwrap().hp.hp, 50);
}

#[test]
fn multi_mode_round_damages_the_first_contact_then_stops() {
    let mut weapons = HashMap::new();
    weapons.insert(
        "bolt".to_string(),
        WeaponSpec {
            kind: WeaponKind::Projectile,
            range_m: 30.0,
            speed_mps: 20.0,
            damage: 15.0,
            ..WeaponSpec::default()
        },
    );
    let mut s = CombatState::with_catalog(WeaponSpecDb::from_records(weapons), sure_hit_model(), 6);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let first = s.spawn_creature(vec3(5.0, 0.0, 0.0), 0.5, 50);
    let behind = s.spawn_creature(vec3(10.0, 0.0, 0.0), 0.5, 50);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "bolt".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Dir(vec3(1.0, 0.0, 0.0)),
        hit_location: None,
    });
    for _ in 0..10 {
        s.step_authoritative(0.1);
    }

    let evs = s.drain_outcomes();
    assert_eq!(evs.len(), 1);
    assert_eq!(evs[0].target, Some(first));
    assert_eq!(s.ecs.get(first).unwrap().hp.hp, 35);
    assert_eq!(s.ecs.get(behind).unwrap().hp.hp, 50, "shielded by the first body");
    assert!(s.projectiles.is_empty());
}
