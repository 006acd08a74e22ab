//! Damage-model tuning loaded from `data/config/damage.toml`.
//!
//! The combat core treats these as opaque constants; rebalancing is a data
//! change, not a code change.

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;

use crate::loader;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DamageModelCfg {
    /// Outgoing scale per point of attacker strength.
    pub strength_scale: f32,
    /// Incoming reduction per point of target defense.
    pub defense_scale: f32,
    pub base_hit_chance: f32,
    pub hit_chance_min: f32,
    pub hit_chance_max: f32,
    /// Hit-chance shift per point of attacker accuracy.
    pub accuracy_scale: f32,
    /// Hit-chance shift per point of target agility (dodge).
    pub agility_scale: f32,
    pub crit_base: f32,
    /// Crit-chance gain per point of attacker critical stat.
    pub crit_stat_scale: f32,
    pub crit_multiplier: f32,
    /// Per-body-region damage scalars; unmapped regions resolve to 1.0.
    pub location_multipliers: HashMap<String, f32>,
}

impl Default for DamageModelCfg {
    fn default() -> Self {
        let mut location_multipliers = HashMap::new();
        location_multipliers.insert("head".to_string(), 2.0);
        location_multipliers.insert("torso".to_string(), 1.0);
        location_multipliers.insert("limbs".to_string(), 0.75);
        Self {
            strength_scale: 0.02,
            defense_scale: 0.015,
            base_hit_chance: 0.85,
            hit_chance_min: 0.05,
            hit_chance_max: 0.99,
            accuracy_scale: 0.01,
            agility_scale: 0.01,
            crit_base: 0.05,
            crit_stat_scale: 0.01,
            crit_multiplier: 2.0,
            location_multipliers,
        }
    }
}

impl DamageModelCfg {
    pub fn load_default() -> Result<Self> {
        let rel = std::path::Path::new("config/damage.toml");
        if loader::data_root().join(rel).is_file() {
            loader::load_toml(rel)
        } else {
            Ok(Self::default())
        }
    }

    #[inline]
    pub fn location_multiplier(&self, key: &str) -> f32 {
        self.location_multipliers.get(key).copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = DamageModelCfg::default();
        assert!(cfg.hit_chance_min < cfg.hit_chance_max);
        assert!(cfg.crit_multiplier > 1.0);
        assert_eq!(cfg.location_multiplier("head"), 2.0);
        assert_eq!(cfg.location_multiplier("tail"), 1.0);
    }
}
