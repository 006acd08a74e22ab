//! In-flight projectile simulation.
//!
//! Projectiles sweep their per-step displacement segment against the world
//! (continuous collision, no tunneling) and hand entity contacts back to the
//! resolver's single-target path so invulnerability/PvP rules apply
//! uniformly. They never mutate health themselves.

use std::collections::HashSet;

use glam::{Quat, Vec3};

use crate::CombatState;
use crate::actor::ActorId;
use crate::ecs::geom;
use crate::systems::zones::{self, AreaPayload};

#[derive(Debug, Clone)]
pub struct InFlightProjectile {
    pub id: u32,
    pub attacker: ActorId,
    pub weapon: String,
    pub pos: Vec3,
    pub dir: Vec3,
    pub speed_mps: f32,
    pub max_range_m: f32,
    pub traveled_m: f32,
    pub pierce: bool,
    /// Target-only damage mode: contacts other than `locked` never damage.
    pub target_only: bool,
    pub locked: Option<ActorId>,
    /// Entities already contacted; each blocks re-application (penetration).
    pub hit_set: Vec<ActorId>,
    /// Contacts are ignored until this clock time.
    pub armed_at_s: f64,
    pub turn_rate_deg_s: f32,
    /// Area burst released when the projectile terminates by contact.
    pub payload: Option<AreaPayload>,
    /// Whether contacts apply the weapon's own damage (false for pure
    /// area-delivery rounds).
    pub direct_damage: bool,
    /// Detonate the payload on range expiry (area delivery "arrival").
    pub detonate_on_expiry: bool,
}

enum Contact {
    Terrain(Vec3),
    Entity(ActorId, Vec3),
}

/// Advance all projectiles one fixed step.
pub fn run(state: &mut CombatState, dt: f32) {
    let now = state.time_s();
    let ids: Vec<u32> = state.projectiles.iter().map(|p| p.id).collect();
    let mut remove: Vec<u32> = Vec::new();
    for pid in ids {
        let Some(mut p) = state.projectiles.iter().find(|p| p.id == pid).cloned() else {
            continue;
        };
        if p.turn_rate_deg_s > 0.0
            && let Some(tid) = p.locked
            && let Some(t) = state.ecs.get(tid)
            && t.hp.alive()
        {
            let max_angle = p.turn_rate_deg_s.to_radians() * dt;
            p.dir = steer_toward(p.dir, t.tr.pos - p.pos, max_angle);
        }
        let step = (p.speed_mps * dt).min(p.max_range_m - p.traveled_m).max(0.0);
        let p0 = p.pos;
        let p1 = p.pos + p.dir * step;
        let mut destroyed = false;
        if now >= p.armed_at_s {
            let mut seg_start = p0;
            loop {
                match nearest_contact(state, &p, seg_start, p1) {
                    None => break,
                    Some(Contact::Terrain(point)) => {
                        detonate(state, &p, point);
                        destroyed = true;
                        break;
                    }
                    Some(Contact::Entity(tid, point)) => {
                        p.hit_set.push(tid);
                        let damages = !p.target_only || p.locked == Some(tid);
                        if damages && p.direct_damage {
                            if let Some(spec) = state.weapon_spec(&p.weapon) {
                                state.apply_single_target(
                                    p.attacker,
                                    tid,
                                    &p.weapon,
                                    &spec,
                                    spec.damage,
                                    None,
                                );
                            }
                        }
                        // Non-piercing rounds stop on first contact no matter
                        // the damage mode; piercing rounds fly on.
                        if !p.pierce {
                            detonate(state, &p, point);
                            destroyed = true;
                            break;
                        }
                        seg_start = point + p.dir * 1e-3;
                    }
                }
            }
        }
        if !destroyed {
            p.pos = p1;
            p.traveled_m += step;
            if p.traveled_m >= p.max_range_m - 1e-4 {
                if p.detonate_on_expiry {
                    detonate(state, &p, p.pos);
                }
                destroyed = true;
            }
        }
        if destroyed {
            remove.push(pid);
        }
        if let Some(slot) = state.projectiles.iter_mut().find(|q| q.id == pid) {
            *slot = p;
        }
    }
    if !remove.is_empty() {
        let gone: HashSet<u32> = remove.into_iter().collect();
        state.projectiles.retain(|p| !gone.contains(&p.id));
    }
}

fn detonate(state: &mut CombatState, p: &InFlightProjectile, point: Vec3) {
    if let Some(payload) = p.payload {
        zones::apply_area_effect(state, p.attacker, &p.weapon, payload, point, true);
    }
}

/// Nearest alive-entity or terrain contact along `[a, b]`, skipping the
/// attacker and everything already in the hit-set.
fn nearest_contact(
    state: &CombatState,
    p: &InFlightProjectile,
    a: Vec3,
    b: Vec3,
) -> Option<Contact> {
    let mut best_t = f32::INFINITY;
    let mut best: Option<Contact> = None;
    for act in state.ecs.iter() {
        if !act.hp.alive() || act.id == p.attacker || p.hit_set.contains(&act.id) {
            continue;
        }
        if let Some(t) = geom::segment_sphere_enter_t(a, b, act.tr.pos, act.tr.radius)
            && t < best_t
        {
            best_t = t;
            best = Some(Contact::Entity(act.id, a + (b - a) * t));
        }
    }
    for ob in state.spatial.obstacles() {
        if let Some(t) = geom::segment_aabb_enter_t(a, b, ob.min, ob.max)
            && t < best_t
        {
            best_t = t;
            best = Some(Contact::Terrain(a + (b - a) * t));
        }
    }
    best
}

/// Rotate `dir` toward `to_target` by at most `max_angle` radians.
fn steer_toward(dir: Vec3, to_target: Vec3, max_angle: f32) -> Vec3 {
    let desired = to_target.normalize_or_zero();
    if desired == Vec3::ZERO {
        return dir;
    }
    let ang = dir.dot(desired).clamp(-1.0, 1.0).acos();
    if ang <= max_angle {
        return desired;
    }
    let axis = dir.cross(desired);
    let axis = if axis.length_squared() < 1e-8 {
        Vec3::Y
    } else {
        axis.normalize()
    };
    (Quat::from_axis_angle(axis, max_angle) * dir).normalize_or_zero()
}
