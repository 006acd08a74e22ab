//! Pure damage pipeline.
//!
//! Fixed stage order: location multiplier, attacker/target stat scaling,
//! hit-chance roll, critical roll. Healing (negative base) bypasses the
//! rolls entirely; upstream gates (filter/PvP/invulnerability) are the only
//! things that can stop a heal. No side effects; deterministic given the
//! draws.

use rand::Rng;

use data_runtime::configs::damage::DamageModelCfg;

use crate::actor::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitLocation {
    Head,
    Torso,
    Limbs,
}

impl HitLocation {
    #[inline]
    pub fn key(&self) -> &'static str {
        match self {
            HitLocation::Head => "head",
            HitLocation::Torso => "torso",
            HitLocation::Limbs => "limbs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "head" => Some(HitLocation::Head),
            "torso" => Some(HitLocation::Torso),
            "limbs" => Some(HitLocation::Limbs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DamageOutput {
    /// Signed final amount; negative heals.
    pub final_amount: f32,
    pub was_hit: bool,
    pub was_critical: bool,
    /// The location multiplier that was applied.
    pub multiplier: f32,
}

/// Chance for the attack to land at all, clamped to the configured band.
#[inline]
pub fn hit_chance(model: &DamageModelCfg, attacker: Option<&Stats>, target: Option<&Stats>) -> f32 {
    let acc = attacker.map(|s| s.accuracy).unwrap_or(0.0);
    let agi = target.map(|s| s.agility).unwrap_or(0.0);
    // max/min chain instead of clamp: an inverted configured band must not
    // panic the resolution path.
    (model.base_hit_chance + acc * model.accuracy_scale - agi * model.agility_scale)
        .max(model.hit_chance_min)
        .min(model.hit_chance_max)
        .max(0.0)
        .min(1.0)
}

#[inline]
pub fn crit_chance(model: &DamageModelCfg, attacker: Option<&Stats>) -> f32 {
    let crit = attacker.map(|s| s.critical).unwrap_or(0.0);
    (model.crit_base + crit * model.crit_stat_scale).clamp(0.0, 1.0)
}

pub fn compute_damage(
    model: &DamageModelCfg,
    base: f32,
    attacker: Option<&Stats>,
    target: Option<&Stats>,
    location: Option<HitLocation>,
    rng: &mut impl Rng,
) -> DamageOutput {
    let multiplier = location
        .map(|l| model.location_multiplier(l.key()))
        .unwrap_or(1.0);
    let mut amount = base * multiplier;
    let strength = attacker.map(|s| s.strength).unwrap_or(0.0);
    let defense = target.map(|s| s.defense).unwrap_or(0.0);
    // Factors floored at zero: stat extremes shrink magnitude, never flip it.
    amount *= (1.0 + strength * model.strength_scale).max(0.0);
    amount *= (1.0 - defense * model.defense_scale).max(0.0);
    if base < 0.0 {
        return DamageOutput {
            final_amount: amount,
            was_hit: true,
            was_critical: false,
            multiplier,
        };
    }
    let hc = hit_chance(model, attacker, target);
    if !rng.gen_bool(f64::from(hc)) {
        return DamageOutput {
            final_amount: 0.0,
            was_hit: false,
            was_critical: false,
            multiplier,
        };
    }
    let cc = crit_chance(model, attacker);
    let was_critical = cc > 0.0 && rng.gen_bool(f64::from(cc));
    if was_critical {
        amount *= model.crit_multiplier;
    }
    DamageOutput {
        final_amount: amount,
        was_hit: true,
        was_critical,
        multiplier,
    }
}
