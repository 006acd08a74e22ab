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

#[test]
fn uncontested_flight_expires_silently_within_one_step_of_range_over_speed() {
    let mut weapons = HashMap::new();
    weapons.insert(
        "slug".to_string(),
        WeaponSpec {
            kind: WeaponKind::Projectile,
            range_m: 20.0,
            speed_mps: 10.0,
            damage: 5.0,
            ..WeaponSpec::default()
        },
    );
    let mut s = CombatState::with_catalog(WeaponSpecDb::from_records(weapons), sure_hit_model(), 4);
    let attacker = s.spawn_player(OwnerId(1), vec3(0.0, 0.0, 0.0), 100);

    s.resolve_attack(AttackRequest {
        attacker,
        weapon: "slug".to_string(),
        origin: vec3(0.0, 0.0, 0.0),
        aim: Aim::Dir(vec3(0.0, 0.0, 1.0)),
        hit_location: None,
    });

    // R/S = 2.0s of flight at dt = 0.25 → 8 advancing steps.
    let dt = 0.25;
    for _ in 0..7 {
        s.step_authoritative(dt);
    }
    assert_eq!(s.projectiles.len(), 1, "still flying short of max range");
    let traveled = s.projectiles[0].traveled_m;
    assert!(traveled < 20.0, "traveled {traveled}");
    s.step_authoritative(dt);
    assert!(s.projectiles.is_empty(), "must self-destruct at max range");
    // "Expired" is silent: no outcome of any kind.
    assert!(s.drain_outcomes().is_empty());
}
