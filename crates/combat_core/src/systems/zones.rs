//! Area resolution and the persistent-zone scheduler.

use glam::Vec3;

use data_runtime::specs::weapons::{ImpactSpec, WeaponSpec};

use crate::CombatState;
use crate::actor::ActorId;

/// Resolved numeric parameters for one area application. Kind-agnostic: both
/// a weapon's own area stats and an impact burst's sub-stats flatten to this.
#[derive(Debug, Clone, Copy)]
pub struct AreaPayload {
    pub radius_m: f32,
    pub damage: f32,
    pub falloff: bool,
    pub max_targets: u32,
    pub duration_s: f32,
    pub tick_interval_s: f32,
}

impl AreaPayload {
    pub fn from_weapon(spec: &WeaponSpec) -> Self {
        Self {
            radius_m: spec.radius_m,
            damage: spec.damage,
            falloff: spec.falloff,
            max_targets: spec.max_targets.unwrap_or(u32::MAX),
            duration_s: spec.duration_s,
            tick_interval_s: spec.tick_interval_s,
        }
    }

    pub fn from_impact(imp: &ImpactSpec) -> Self {
        Self {
            radius_m: imp.radius_m,
            damage: imp.damage,
            falloff: imp.falloff,
            max_targets: imp.max_targets.unwrap_or(u32::MAX),
            duration_s: imp.duration_s,
            tick_interval_s: imp.tick_interval_s,
        }
    }
}

/// A re-ticking area effect. The attacker reference is non-owning; the zone
/// outlives its attacker.
#[derive(Debug, Clone)]
pub struct PersistentZone {
    pub id: u32,
    pub center: Vec3,
    pub weapon: String,
    pub attacker: ActorId,
    pub payload: AreaPayload,
    pub start_s: f64,
    pub last_tick_s: f64,
}

/// Apply one area effect at `center`, in ascending-distance order, stopping
/// after `max_targets` applications. When `allow_persist` is set and the
/// payload defines persistence, registers a zone; this first application is
/// tick zero.
pub fn apply_area_effect(
    state: &mut CombatState,
    attacker: ActorId,
    weapon: &str,
    payload: AreaPayload,
    center: Vec3,
    allow_persist: bool,
) {
    let Some(spec) = state.weapon_spec(weapon) else {
        // Catalog is read-only after load; a vanished id is a programming error.
        debug_assert!(false, "area effect for unknown weapon '{weapon}'");
        log::warn!("combat: area effect skipped, unknown weapon '{weapon}'");
        return;
    };
    let candidates = state
        .spatial
        .query_in_radius(&state.ecs, center, payload.radius_m, &[]);
    let mut applied = 0u32;
    for (tid, dist) in candidates {
        if applied >= payload.max_targets {
            break;
        }
        let fall = if payload.falloff {
            (1.0 - dist / payload.radius_m).max(0.0)
        } else {
            1.0
        };
        if payload.falloff && fall <= 0.0 {
            // Zero-magnitude candidates are excluded, not zero-damage outcomes.
            continue;
        }
        if state.apply_single_target(attacker, tid, weapon, &spec, payload.damage * fall, None) {
            applied += 1;
        }
    }
    if allow_persist && payload.duration_s > 0.0 && payload.tick_interval_s > 0.0 {
        let id = state.alloc_zone_id();
        let now = state.time_s();
        state.zones.push(PersistentZone {
            id,
            center,
            weapon: weapon.to_string(),
            attacker,
            payload,
            start_s: now,
            last_tick_s: now,
        });
        metrics::counter!("combat.zones_spawned_total").increment(1);
    }
}

/// Advance zones one fixed tick: re-apply due zones, then destroy expired
/// ones. A zone's final tick may land less than one interval before expiry.
pub fn run(state: &mut CombatState) {
    let now = state.time_s();
    let mut due: Vec<(ActorId, String, AreaPayload, Vec3)> = Vec::new();
    for z in &mut state.zones {
        if now - z.last_tick_s >= f64::from(z.payload.tick_interval_s) {
            z.last_tick_s = now;
            due.push((z.attacker, z.weapon.clone(), z.payload, z.center));
        }
    }
    for (attacker, weapon, payload, center) in due {
        apply_area_effect(state, attacker, &weapon, payload, center, false);
    }
    state
        .zones
        .retain(|z| now - z.start_s < f64::from(z.payload.duration_s));
}
