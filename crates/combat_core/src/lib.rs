//! Authoritative combat resolution core.
//!
//! One decision point (`CombatState::resolve_attack`) behind four resolution
//! strategies: melee range-check, ballistic projectile, hitscan ray, and
//! area effect with optional persistence. Every attack passes through the
//! telegraph queue before its outcome is computed, so targets keep a real
//! chance to escape. Outcomes are pushed to an event channel the host
//! drains; `step_authoritative` must be called at a stable cadence.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use data_runtime::configs::damage::DamageModelCfg;
use data_runtime::specs::weapons::{DamageMode, WeaponKind, WeaponSpec, WeaponSpecDb};

pub mod actor;
pub mod damage;
pub mod ecs;
pub mod events;
pub mod invuln;
pub mod rules;
pub mod spatial;
pub mod systems;
pub mod telemetry;

pub use actor::{Actor, ActorId, ActorKind, Health, OwnerId, Stats, Transform};
pub use damage::HitLocation;
pub use events::OutcomeEvent;
pub use rules::CombatRules;
pub use systems::projectiles::InFlightProjectile;
pub use systems::telegraph::PendingAttack;
pub use systems::zones::{AreaPayload, PersistentZone};

use ecs::WorldEcs;
use invuln::InvulnerabilityTracker;
use spatial::SpatialIndex;

/// How an attack is aimed. Which variants a weapon accepts depends on its
/// kind and is validated at request time.
#[derive(Debug, Clone, Copy)]
pub enum Aim {
    Dir(Vec3),
    Target(ActorId),
    Point(Vec3),
}

#[derive(Debug, Clone)]
pub struct AttackRequest {
    pub attacker: ActorId,
    pub weapon: String,
    pub origin: Vec3,
    pub aim: Aim,
    pub hit_location: Option<HitLocation>,
}

pub struct CombatState {
    pub ecs: WorldEcs,
    pub spatial: SpatialIndex,
    pub projectiles: Vec<InFlightProjectile>,
    pub zones: Vec<PersistentZone>,
    rules: CombatRules,
    weapons: WeaponSpecDb,
    damage_model: DamageModelCfg,
    rng: ChaCha8Rng,
    time_s: f64,
    pub(crate) pending: Vec<PendingAttack>,
    pub(crate) invuln: InvulnerabilityTracker,
    outcomes: Vec<OutcomeEvent>,
    next_proj_id: u32,
    next_zone_id: u32,
}

impl CombatState {
    /// Load the default catalogs. Load failures fall back to builtin data;
    /// a bad data file must not take the server down.
    pub fn new(seed: u64) -> Self {
        let weapons = WeaponSpecDb::load_default().unwrap_or_else(|e| {
            log::warn!("combat: weapon catalog load failed: {e:#}; using builtin set");
            WeaponSpecDb::builtin()
        });
        let damage_model = DamageModelCfg::load_default().unwrap_or_else(|e| {
            log::warn!("combat: damage model load failed: {e:#}; using defaults");
            DamageModelCfg::default()
        });
        Self::with_catalog(weapons, damage_model, seed)
    }

    pub fn with_catalog(weapons: WeaponSpecDb, damage_model: DamageModelCfg, seed: u64) -> Self {
        Self {
            ecs: WorldEcs::new(),
            spatial: SpatialIndex::default(),
            projectiles: Vec::new(),
            zones: Vec::new(),
            rules: CombatRules::default(),
            weapons,
            damage_model,
            rng: ChaCha8Rng::seed_from_u64(seed),
            time_s: 0.0,
            pending: Vec::new(),
            invuln: InvulnerabilityTracker::default(),
            outcomes: Vec::new(),
            next_proj_id: 1,
            next_zone_id: 1,
        }
    }

    pub fn set_rules(&mut self, rules: CombatRules) {
        self.rules = rules;
    }

    #[inline]
    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    // ------------------------------------------------------------------
    // Host-facing world surface
    // ------------------------------------------------------------------

    pub fn spawn_player(&mut self, owner: OwnerId, pos: Vec3, hp: i32) -> ActorId {
        self.ecs.spawn(
            ActorKind::Player,
            Some(owner),
            Transform {
                pos,
                yaw: 0.0,
                radius: 0.7,
            },
            Health { hp, max: hp },
            Stats::default(),
        )
    }

    pub fn spawn_creature(&mut self, pos: Vec3, radius: f32, hp: i32) -> ActorId {
        self.ecs.spawn(
            ActorKind::Creature,
            None,
            Transform {
                pos,
                yaw: 0.0,
                radius,
            },
            Health { hp, max: hp },
            Stats::default(),
        )
    }

    pub fn set_stats(&mut self, id: ActorId, stats: Stats) {
        if let Some(a) = self.ecs.get_mut(id) {
            a.stats = stats;
        }
    }

    pub fn set_position(&mut self, id: ActorId, pos: Vec3) {
        if let Some(a) = self.ecs.get_mut(id) {
            a.tr.pos = pos;
        }
    }

    /// Remove a combatant outright. Outstanding projectiles and zones keep
    /// flying/ticking; their attacker references are non-owning.
    pub fn despawn(&mut self, id: ActorId) -> bool {
        self.invuln.forget_actor(id);
        self.ecs.remove(id)
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.ecs.get(id).map(|a| a.hp.alive()).unwrap_or(false)
    }

    /// Positive removes health, negative heals (clamped to max).
    pub fn apply_health_delta(&mut self, id: ActorId, delta: i32) -> bool {
        if let Some(a) = self.ecs.get_mut(id) {
            a.hp.hp = (a.hp.hp - delta).max(0);
            a.hp.clamp();
            true
        } else {
            false
        }
    }

    pub fn add_obstacle(&mut self, min: Vec3, max: Vec3) {
        self.spatial.add_obstacle(min, max);
    }

    pub fn is_immune(&mut self, target: ActorId, class: &str) -> bool {
        let now = self.time_s;
        self.invuln.is_immune(target, class, now)
    }

    // ------------------------------------------------------------------
    // Attack entry point + fixed tick
    // ------------------------------------------------------------------

    /// Fire-and-forget. Outcomes surface later on the event channel since
    /// every kind may resolve past this call.
    pub fn resolve_attack(&mut self, req: AttackRequest) {
        metrics::counter!("combat.requests_total").increment(1);
        let Some(spec) = self.weapons.get(&req.weapon).cloned() else {
            log::warn!(
                "combat: rejecting attack from {:?}: unknown weapon '{}'",
                req.attacker,
                req.weapon
            );
            metrics::counter!("combat.rejected_total").increment(1);
            return;
        };
        // Attacker gone or dead is a transient world-state condition: no-op.
        let Some(attacker) = self.ecs.get(req.attacker).copied() else {
            return;
        };
        if !attacker.hp.alive() {
            return;
        }
        if let Err(e) = validate_aim(&req, &spec, &attacker) {
            log::warn!(
                "combat: rejecting attack from {:?} with '{}': {e}",
                req.attacker,
                req.weapon
            );
            metrics::counter!("combat.rejected_total").increment(1);
            return;
        }
        let now = self.time_s;
        self.pending.push(PendingAttack {
            req,
            issued_at_s: now,
            ready_at_s: now + f64::from(spec.telegraph_s),
        });
    }

    /// Advance the authoritative clock one fixed step: mature telegraphs,
    /// fly projectiles, tick zones. No failure in here may halt the tick.
    pub fn step_authoritative(&mut self, dt: f32) {
        let t0 = std::time::Instant::now();
        self.time_s += f64::from(dt);
        self.spatial.rebuild(&self.ecs);
        systems::telegraph::run(self);
        systems::projectiles::run(self, dt);
        systems::zones::run(self);
        metrics::histogram!("combat.tick_ms").record(t0.elapsed().as_secs_f64() * 1000.0);
    }

    /// Drain the outcome event channel.
    pub fn drain_outcomes(&mut self) -> Vec<OutcomeEvent> {
        std::mem::take(&mut self.outcomes)
    }

    // ------------------------------------------------------------------
    // Internal surface shared by the systems
    // ------------------------------------------------------------------

    pub(crate) fn weapon_spec(&self, id: &str) -> Option<WeaponSpec> {
        self.weapons.get(id).cloned()
    }

    pub(crate) fn push_outcome(&mut self, ev: OutcomeEvent) {
        metrics::counter!("combat.outcomes_total").increment(1);
        self.outcomes.push(ev);
    }

    pub(crate) fn alloc_projectile_id(&mut self) -> u32 {
        let id = self.next_proj_id;
        self.next_proj_id = self.next_proj_id.wrapping_add(1);
        id
    }

    pub(crate) fn alloc_zone_id(&mut self) -> u32 {
        let id = self.next_zone_id;
        self.next_zone_id = self.next_zone_id.wrapping_add(1);
        id
    }

    /// The single-target application path every kind funnels through:
    /// target filter, PvP permission, invulnerability gate, damage pipeline,
    /// health mutation, outcome event, invulnerability grant. Returns whether
    /// an effect was applied (and so counts toward AOE `max_targets`).
    pub(crate) fn apply_single_target(
        &mut self,
        attacker: ActorId,
        target: ActorId,
        weapon: &str,
        spec: &WeaponSpec,
        base: f32,
        location: Option<HitLocation>,
    ) -> bool {
        use data_runtime::specs::weapons::TargetFilter;
        let Some(t_actor) = self.ecs.get(target).copied() else {
            return false;
        };
        if !t_actor.hp.alive() {
            return false;
        }
        let a_actor = self.ecs.get(attacker).copied();
        // A despawned attacker counts as non-allied: enemy-filtered damage
        // still lands, ally-filtered healing stops.
        let allied = a_actor
            .map(|a| self.rules.are_allies(&a, &t_actor))
            .unwrap_or(false);
        let pass = match spec.target_filter {
            TargetFilter::Allies => allied,
            TargetFilter::Enemies => !allied,
            TargetFilter::All => true,
        };
        if !pass {
            return false;
        }
        if let Some(a) = &a_actor
            && !self.rules.is_attack_allowed(a, &t_actor)
        {
            return false;
        }
        let now = self.time_s;
        if let Some(class) = &spec.invuln_class
            && self.invuln.is_immune(target, class, now)
        {
            let ev = OutcomeEvent::blocked(attacker, target, weapon, t_actor.hp.hp);
            self.push_outcome(ev);
            return false;
        }
        let att_stats = a_actor.map(|a| a.stats);
        let out = damage::compute_damage(
            &self.damage_model,
            base,
            att_stats.as_ref(),
            Some(&t_actor.stats),
            location,
            &mut self.rng,
        );
        if !out.was_hit {
            let ev = OutcomeEvent::missed(attacker, target, weapon, t_actor.hp.hp);
            self.push_outcome(ev);
            return false;
        }
        let delta = out.final_amount.round() as i32;
        let Some(tm) = self.ecs.get_mut(target) else {
            return false;
        };
        let hp_before = tm.hp.hp;
        tm.hp.hp = (tm.hp.hp - delta).max(0);
        tm.hp.clamp();
        let hp_after = tm.hp.hp;
        let fatal = hp_before > 0 && hp_after == 0;
        self.push_outcome(OutcomeEvent {
            attacker,
            target: Some(target),
            weapon: weapon.to_string(),
            delta,
            was_hit: true,
            was_critical: out.was_critical,
            was_evaded: false,
            blocked_by_invuln: false,
            hp_before,
            hp_after,
            fatal,
        });
        if let Some(class) = &spec.invuln_class
            && spec.invuln_window_s > 0.0
        {
            self.invuln.grant(target, class, now, spec.invuln_window_s);
        }
        true
    }
}

fn validate_aim(req: &AttackRequest, spec: &WeaponSpec, attacker: &Actor) -> anyhow::Result<()> {
    use anyhow::bail;
    match spec.kind {
        WeaponKind::Melee => {
            if !matches!(req.aim, Aim::Target(_)) {
                bail!("melee needs a locked target");
            }
        }
        WeaponKind::Hitscan => {
            if matches!(req.aim, Aim::Point(_)) {
                bail!("hitscan aims by direction or locked target");
            }
        }
        WeaponKind::Projectile => {
            if matches!(req.aim, Aim::Point(_)) {
                bail!("projectile aims by direction or locked target");
            }
            if spec.damage_mode == DamageMode::TargetOnly && !matches!(req.aim, Aim::Target(_)) {
                bail!("target-only projectile needs a locked target");
            }
        }
        WeaponKind::Aoe => {
            if spec.range_m > 0.0 {
                match req.aim {
                    Aim::Point(p) => {
                        let d = (p - attacker.tr.pos).length();
                        if d > spec.range_m {
                            bail!("epicenter {d:.1}m beyond range {:.1}m", spec.range_m);
                        }
                    }
                    Aim::Target(_) => {}
                    Aim::Dir(_) => bail!("ranged aoe needs an epicenter point or locked target"),
                }
            }
        }
    }
    Ok(())
}
