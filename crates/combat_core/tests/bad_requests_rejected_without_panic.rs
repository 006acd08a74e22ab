use combat_core::{Aim, AttackRequest, CombatState, OwnerId};
use data_runtime::configs::damage::DamageModelCfg;
use data_runtime::specs::weapons::{WeaponSpec, WeaponSpecDb};
use glam::vec3;
use std::collections::HashMap;

fn catalog() -> WeaponSpecDb {
    let mut weapons = HashMap::new();
    weapons.insert(
        "hand_axe".to_string(),
        WeaponSpec {
            range_m: 3.0,
            damage: 18.0,
            ..WeaponSpec::default()
        },
    );
    WeaponSpecDb::from_records(weapons)
}

#[test]
fn unknown_weapon_id_rejects_only_that_request() {
    let mut s = CombatState::with_catalog(catalog(), DamageModelCfg::default(), 30);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let target = s.spawn_creature(vec3(2.0, 0.0, 0.0), 0.9, 60);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "rail_cannon".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Target(target),
        hit_location: None,
    });
    for _ in 0..5 {
        s.step_authoritative(0.1);
    }
    assert!(s.drain_outcomes().is_empty());
    assert_eq!(s.ecs.get(target).unwrap().hp.hp, 60);
    assert!(s.is_alive(attacker), "the tick must keep running");
}

#[test]
fn melee_without_locked_target_is_rejected() {
    let mut s = CombatState::with_catalog(catalog(), DamageModelCfg::default(), 30);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let target = s.spawn_creature(vec3(2.0, 0.0, 0.0), 0.9, 60);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "hand_axe".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Dir(vec3(1.0, 0.0, 0.0)),
        hit_location: None,
    });
    for _ in 0..5 {
        s.step_authoritative(0.1);
    }
    assert!(s.drain_outcomes().is_empty());
    assert_eq!(s.ecs.get(target).unwrap().hp.hp, 60);
}

#[test]
fn request_from_despawned_attacker_is_a_silent_noop() {
    let mut s = CombatState::with_catalog(catalog(), DamageModelCfg::default(), 30);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let target = s.spawn_creature(vec3(2.0, 0.0, 0.0), 0.9, 60);
    s.despawn(attacker);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "hand_axe".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Target(target),
        hit_location: None,
    });
    for _ in 0..5 {
        s.step_authoritative(0.1);
    }
    assert!(s.drain_outcomes().is_empty());
    assert_eq!(s.ecs.get(target).unwrap().hp.hp, 60);
}
