//! The telegraph queue and per-kind attack resolution.
//!
//! Between commit and effect every attack sits in the pending queue, the one
//! suspension point in the core. Maturity is decided by the simulation clock;
//! cancellation is tied to liveness (attacker or required target gone before
//! maturity drops the entry silently).

use glam::Vec3;

use data_runtime::specs::weapons::{DamageMode, WeaponKind, WeaponSpec};

use crate::actor::Actor;
use crate::events::OutcomeEvent;
use crate::systems::projectiles::InFlightProjectile;
use crate::systems::zones::{self, AreaPayload};
use crate::{Aim, AttackRequest, CombatState};

#[derive(Debug, Clone)]
pub struct PendingAttack {
    pub req: AttackRequest,
    pub issued_at_s: f64,
    pub ready_at_s: f64,
}

/// Mature and resolve due telegraphs.
pub fn run(state: &mut CombatState) {
    let now = state.time_s();
    let pending = std::mem::take(&mut state.pending);
    let mut keep = Vec::with_capacity(pending.len());
    for pa in pending {
        if pa.ready_at_s <= now {
            resolve_ready(state, pa);
        } else if state.ecs.get(pa.req.attacker).is_some() {
            keep.push(pa);
        }
    }
    state.pending.append(&mut keep);
}

fn resolve_ready(state: &mut CombatState, pa: PendingAttack) {
    let Some(spec) = state.weapon_spec(&pa.req.weapon) else {
        return;
    };
    let Some(attacker) = state.ecs.get(pa.req.attacker).copied() else {
        return;
    };
    if !attacker.hp.alive() {
        return;
    }
    match spec.kind {
        WeaponKind::Melee => resolve_melee(state, &pa.req, &spec, &attacker),
        WeaponKind::Hitscan => resolve_hitscan(state, &pa.req, &spec, &attacker),
        WeaponKind::Projectile => launch_projectile(state, &pa.req, &spec),
        WeaponKind::Aoe => resolve_area(state, &pa.req, &spec, &attacker),
    }
}

/// Melee commits during the telegraph; evasion is decided by distance at
/// resolution time, not commit time.
fn resolve_melee(state: &mut CombatState, req: &AttackRequest, spec: &WeaponSpec, attacker: &Actor) {
    let Aim::Target(tid) = req.aim else { return };
    let Some(target) = state.ecs.get(tid).copied() else {
        return;
    };
    if !target.hp.alive() {
        return;
    }
    let dist = (target.tr.pos - attacker.tr.pos).length();
    if dist > spec.range_m {
        let ev = OutcomeEvent::evaded(req.attacker, tid, &req.weapon, target.hp.hp);
        state.push_outcome(ev);
        return;
    }
    state.apply_single_target(req.attacker, tid, &req.weapon, spec, spec.damage, req.hit_location);
}

fn resolve_hitscan(
    state: &mut CombatState,
    req: &AttackRequest,
    spec: &WeaponSpec,
    attacker: &Actor,
) {
    match req.aim {
        // Locked mode: the supplied target, range check only (no world ray),
        // plus a terrain-only LOS ray when the weapon demands one.
        Aim::Target(tid) => {
            let Some(target) = state.ecs.get(tid).copied() else {
                return;
            };
            if !target.hp.alive() {
                return;
            }
            let dist = (target.tr.pos - attacker.tr.pos).length();
            if dist > spec.range_m
                || (spec.requires_los && !state.spatial.los_clear(attacker.tr.pos, target.tr.pos))
            {
                let ev = OutcomeEvent::evaded(req.attacker, tid, &req.weapon, target.hp.hp);
                state.push_outcome(ev);
                return;
            }
            let applied =
                state.apply_single_target(req.attacker, tid, &req.weapon, spec, spec.damage, req.hit_location);
            if applied && let Some(imp) = &spec.impact {
                zones::apply_area_effect(
                    state,
                    req.attacker,
                    &req.weapon,
                    AreaPayload::from_impact(imp),
                    target.tr.pos,
                    true,
                );
            }
        }
        // Free-aim: first entity along the ray; terrain or nothing is a
        // no-target outcome and grants no invulnerability.
        Aim::Dir(d) => {
            let hit = state
                .spatial
                .cast_ray(&state.ecs, req.origin, d, spec.range_m, &[req.attacker]);
            match hit {
                Some(h) if h.target.is_some() => {
                    let Some(tid) = h.target else { return };
                    let applied = state.apply_single_target(
                        req.attacker,
                        tid,
                        &req.weapon,
                        spec,
                        spec.damage,
                        req.hit_location,
                    );
                    if applied && let Some(imp) = &spec.impact {
                        zones::apply_area_effect(
                            state,
                            req.attacker,
                            &req.weapon,
                            AreaPayload::from_impact(imp),
                            h.point,
                            true,
                        );
                    }
                }
                _ => {
                    let ev = OutcomeEvent::no_target(req.attacker, &req.weapon);
                    state.push_outcome(ev);
                }
            }
        }
        Aim::Point(_) => {}
    }
}

/// Damage is deferred to the collision hand-back in the simulator.
fn launch_projectile(state: &mut CombatState, req: &AttackRequest, spec: &WeaponSpec) {
    let (dir, locked) = match req.aim {
        Aim::Dir(d) => (d.normalize_or_zero(), None),
        Aim::Target(tid) => {
            let Some(t) = state.ecs.get(tid) else { return };
            if !t.hp.alive() {
                return;
            }
            ((t.tr.pos - req.origin).normalize_or_zero(), Some(tid))
        }
        Aim::Point(_) => return,
    };
    if dir == Vec3::ZERO {
        return;
    }
    let p = InFlightProjectile {
        id: state.alloc_projectile_id(),
        attacker: req.attacker,
        weapon: req.weapon.clone(),
        pos: req.origin,
        dir,
        speed_mps: spec.speed_mps,
        max_range_m: spec.range_m,
        traveled_m: 0.0,
        pierce: spec.pierce,
        target_only: spec.damage_mode == DamageMode::TargetOnly,
        locked,
        hit_set: Vec::new(),
        armed_at_s: state.time_s() + f64::from(spec.arm_after_s),
        turn_rate_deg_s: spec.turn_rate_deg_s,
        payload: spec.impact.as_ref().map(AreaPayload::from_impact),
        direct_damage: true,
        detonate_on_expiry: false,
    };
    state.projectiles.push(p);
}

fn resolve_area(state: &mut CombatState, req: &AttackRequest, spec: &WeaponSpec, attacker: &Actor) {
    let center = if spec.range_m <= 0.0 {
        // Self-centered burst.
        attacker.tr.pos
    } else {
        match req.aim {
            Aim::Point(p) => p,
            Aim::Target(tid) => match state.ecs.get(tid) {
                Some(t) if t.hp.alive() => t.tr.pos,
                _ => return,
            },
            Aim::Dir(_) => return,
        }
    };
    let payload = AreaPayload::from_weapon(spec);
    if spec.speed_mps > 0.0 {
        let dir = (center - attacker.tr.pos).normalize_or_zero();
        if dir == Vec3::ZERO {
            zones::apply_area_effect(state, req.attacker, &req.weapon, payload, center, true);
            return;
        }
        // Lobbed delivery: a round that arms, flies to the epicenter and
        // detonates on contact or arrival.
        let p = InFlightProjectile {
            id: state.alloc_projectile_id(),
            attacker: req.attacker,
            weapon: req.weapon.clone(),
            pos: attacker.tr.pos,
            dir,
            speed_mps: spec.speed_mps,
            max_range_m: (center - attacker.tr.pos).length(),
            traveled_m: 0.0,
            pierce: false,
            target_only: false,
            locked: None,
            hit_set: Vec::new(),
            armed_at_s: state.time_s() + f64::from(spec.arm_after_s),
            turn_rate_deg_s: 0.0,
            payload: Some(payload),
            direct_damage: false,
            detonate_on_expiry: true,
        };
        state.projectiles.push(p);
    } else {
        zones::apply_area_effect(state, req.attacker, &req.weapon, payload, center, true);
    }
}
