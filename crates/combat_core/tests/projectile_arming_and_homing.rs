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

#[test]
fn arming_delay_lets_the_round_pass_point_blank_bodies() {
    let mut weapons = HashMap::new();
    weapons.insert(
        "mortar_shell".to_string(),
        WeaponSpec {
            kind: WeaponKind::Projectile,
            range_m: 40.0,
            speed_mps: 10.0,
            damage: 25.0,
            arm_after_s: 0.3,
            ..WeaponSpec::default()
        },
    );
    let mut s =
        CombatState::with_catalog(WeaponSpecDb::from_records(weapons), sure_hit_model(), 25);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let adjacent = s.spawn_creature(vec3(2.0, 0.0, 0.0), 0.5, 60);
    let downrange = s.spawn_creature(vec3(8.0, 0.0, 0.0), 0.5, 60);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "mortar_shell".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Dir(vec3(1.0, 0.0, 0.0)),
        hit_location: None,
    });
    for _ in 0..20 {
        s.step_authoritative(0.1);
    }

    // The round flew through the adjacent body while unarmed and detonated
    // on the first body it met after arming.
    let evs = s.drain_outcomes();
    assert_eq!(evs.len(), 1, "{evs:?}");
    assert_eq!(evs[0].target, Some(downrange));
    assert_eq!(s.ecs.get(adjacent).unwrap().hp.hp, 60);
    assert_eq!(s.ecs.get(downrange).unwrap().hp.hp, 35);
}

#[test]
fn homing_round_tracks_a_target_that_sidesteps() {
    let mut weapons = HashMap::new();
    weapons.insert(
        "seeker".to_string(),
        WeaponSpec {
            kind: WeaponKind::Projectile,
            range_m: 100.0,
            speed_mps: 20.0,
            damage: 14.0,
            damage_mode: DamageMode::TargetOnly,
            turn_rate_deg_s: 720.0,
            ..WeaponSpec::default()
        },
    );
    let mut s =
        CombatState::with_catalog(WeaponSpecDb::from_records(weapons), sure_hit_model(), 25);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let target = s.spawn_creature(vec3(12.0, 0.0, 0.0), 0.6, 60);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "seeker".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Target(target),
        hit_location: None,
    });
    s.step_authoritative(0.05);
    // Sidestep after launch; the seeker corrects course.
    s.set_position(target, vec3(12.0, 0.0, 6.0));
    for _ in 0..60 {
        s.step_authoritative(0.05);
    }

    let evs = s.drain_outcomes();
    assert_eq!(evs.len(), 1, "{evs:?}");
    assert_eq!(evs[0].target, Some(target));
    assert_eq!(s.ecs.get(target).unwrap().hp.hp, 46);
    assert!(s.projectiles.is_empty());
}
