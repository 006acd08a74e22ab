use combat_core::{Aim, AttackRequest, CombatState, OwnerId};
use data_runtime::configs::damage::DamageModelCfg;
use data_runtime::specs::weapons::{WeaponKind, WeaponSpec, WeaponSpecDb};
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

fn marksman(requires_los: bool) -> WeaponSpecDb {
    let mut weapons = HashMap::new();
    weapons.insert(
        "marksman".to_string(),
        WeaponSpec {
            kind: WeaponKind::Hitscan,
            range_m: 25.0,
            damage: 20.0,
            requires_los,
            ..WeaponSpec::default()
        },
    );
    WeaponSpecDb::from_records(weapons)
}

fn shot(attacker: combat_core::ActorId, target: combat_core::ActorId) -> AttackRequest {
    AttackRequest {
        attacker,
        weapon: "marksman".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Target(target),
        hit_location: None,
    }
}

#[test]
fn locked_mode_checks_range_only() {
    let mut s = CombatState::with_catalog(marksman(false), sure_hit_model(), 12);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let near = s.spawn_creature(vec3(8.0, 0.0, 0.0), 0.9, 50);
    let far = s.spawn_creature(vec3(40.0, 0.0, 0.0), 0.9, 50);

    s.resolve_attack(shot(attacker, near));
    s.step_authoritative(0.05);
    let evs = s.drain_outcomes();
    assert!(evs[0].was_hit);
    assert_eq!(s.ecs.get(near).unwrap().hp.hp, 30);

    s.resolve_attack(shot(attacker, far));
    s.step_authoritative(0.05);
    let evs = s.drain_outcomes();
    assert_eq!(evs.len(), 1);
    assert!(evs[0].was_evaded, "out of range resolves as evaded");
    assert_eq!(s.ecs.get(far).unwrap().hp.hp, 50);
}

#[test]
fn los_requirement_blocks_through_walls_in_locked_mode() {
    let mut s = CombatState::with_catalog(marksman(true), sure_hit_model(), 12);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);
    let target = s.spawn_creature(vec3(10.0, 0.0, 0.0), 0.9, 50);
    s.add_obstacle(vec3(4.0, -1.0, -1.0), vec3(5.0, 2.0, 1.0));

    s.resolve_attack(shot(attacker, target));
    s.step_authoritative(0.05);
    let evs = s.drain_outcomes();
    assert_eq!(evs.len(), 1);
    assert!(evs[0].was_evaded);
    assert_eq!(s.ecs.get(target).unwrap().hp.hp, 50);
}
