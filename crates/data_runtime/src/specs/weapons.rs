//! Weapon catalog: static, read-only weapon definitions keyed by id.
//!
//! Loaded once at startup from `data/config/weapons.toml`. Validation is
//! best-effort and per-record: a malformed definition is logged and skipped so
//! one bad entry cannot take the whole catalog down.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::collections::HashMap;

use crate::loader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Melee,
    Projectile,
    Hitscan,
    Aoe,
}

/// Which combatants an application may affect, relative to the attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFilter {
    Allies,
    #[default]
    Enemies,
    All,
}

/// Whether a projectile affects any entity touched or only its locked target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageMode {
    #[default]
    Multi,
    TargetOnly,
}

/// Sub-stats for an impact-triggered area effect (e.g. a grenade burst on a
/// projectile, or a splash on a hitscan shot).
#[derive(Debug, Clone, Deserialize)]
pub struct ImpactSpec {
    pub radius_m: f32,
    pub damage: f32,
    #[serde(default)]
    pub falloff: bool,
    #[serde(default)]
    pub max_targets: Option<u32>,
    #[serde(default)]
    pub duration_s: f32,
    #[serde(default)]
    pub tick_interval_s: f32,
}

/// One immutable weapon definition. Which optional fields apply is decided by
/// `kind` and enforced by [`WeaponSpec::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    /// Melee/hitscan reach, projectile max flight distance, AOE placement
    /// range (0 = self-centered).
    #[serde(default)]
    pub range_m: f32,
    /// Signed base amount; negative heals.
    #[serde(default)]
    pub damage: f32,
    /// Carried for the host's cooldown gate; not enforced here.
    #[serde(default)]
    pub cooldown_s: f32,
    /// Commit-to-effect window. Targets may escape during it.
    #[serde(default)]
    pub telegraph_s: f32,
    #[serde(default)]
    pub speed_mps: f32,
    #[serde(default)]
    pub radius_m: f32,
    #[serde(default)]
    pub falloff: bool,
    #[serde(default)]
    pub max_targets: Option<u32>,
    #[serde(default)]
    pub duration_s: f32,
    #[serde(default)]
    pub tick_interval_s: f32,
    #[serde(default)]
    pub target_filter: TargetFilter,
    #[serde(default)]
    pub requires_los: bool,
    #[serde(default)]
    pub pierce: bool,
    #[serde(default)]
    pub damage_mode: DamageMode,
    /// Immunity-window grouping shared across weapons; None grants no window.
    #[serde(default)]
    pub invuln_class: Option<String>,
    #[serde(default)]
    pub invuln_window_s: f32,
    /// Projectile collisions are ignored until this much flight time elapses.
    #[serde(default)]
    pub arm_after_s: f32,
    /// Bounded homing toward a locked target, degrees per second. 0 = none.
    #[serde(default)]
    pub turn_rate_deg_s: f32,
    #[serde(default)]
    pub impact: Option<ImpactSpec>,
}

/// Programmatic base for builders and tests: a plain short-reach melee swing.
/// Parsing does not use this; absent TOML fields default per-field to
/// zero/None so validation can catch genuinely missing stats.
impl Default for WeaponSpec {
    fn default() -> Self {
        Self {
            kind: WeaponKind::Melee,
            range_m: 2.0,
            damage: 10.0,
            cooldown_s: 0.0,
            telegraph_s: 0.0,
            speed_mps: 0.0,
            radius_m: 0.0,
            falloff: false,
            max_targets: None,
            duration_s: 0.0,
            tick_interval_s: 0.0,
            target_filter: TargetFilter::Enemies,
            requires_los: false,
            pierce: false,
            damage_mode: DamageMode::Multi,
            invuln_class: None,
            invuln_window_s: 0.0,
            arm_after_s: 0.0,
            turn_rate_deg_s: 0.0,
            impact: None,
        }
    }
}

impl WeaponSpec {
    /// Kind-dependent field validation. Called once per record at load.
    pub fn validate(&self, id: &str) -> Result<()> {
        match self.kind {
            WeaponKind::Melee => {
                if self.range_m <= 0.0 {
                    bail!("weapon '{id}': melee requires range_m > 0");
                }
            }
            WeaponKind::Projectile => {
                if self.speed_mps <= 0.0 {
                    bail!("weapon '{id}': projectile requires speed_mps > 0");
                }
                if self.range_m <= 0.0 {
                    bail!("weapon '{id}': projectile requires range_m > 0");
                }
                if self.pierce && self.impact.is_some() {
                    bail!("weapon '{id}': piercing projectile cannot carry an impact burst");
                }
            }
            WeaponKind::Hitscan => {
                if self.range_m <= 0.0 {
                    bail!("weapon '{id}': hitscan requires range_m > 0");
                }
            }
            WeaponKind::Aoe => {
                if self.radius_m <= 0.0 {
                    bail!("weapon '{id}': aoe requires radius_m > 0");
                }
                if self.duration_s > 0.0 && self.tick_interval_s <= 0.0 {
                    bail!("weapon '{id}': persistent aoe requires tick_interval_s > 0");
                }
            }
        }
        if self.telegraph_s < 0.0 {
            bail!("weapon '{id}': telegraph_s must not be negative");
        }
        if self.invuln_window_s > 0.0 && self.invuln_class.is_none() {
            bail!("weapon '{id}': invuln_window_s set without invuln_class");
        }
        if self.max_targets == Some(0) {
            bail!("weapon '{id}': max_targets must be at least 1 when set");
        }
        if let Some(imp) = &self.impact {
            if imp.radius_m <= 0.0 {
                bail!("weapon '{id}': impact burst requires radius_m > 0");
            }
            if imp.duration_s > 0.0 && imp.tick_interval_s <= 0.0 {
                bail!("weapon '{id}': persistent impact burst requires tick_interval_s > 0");
            }
        }
        if self.damage == 0.0 && self.impact.is_none() {
            bail!("weapon '{id}': defines neither damage nor an impact burst");
        }
        Ok(())
    }

    #[inline]
    pub fn is_heal(&self) -> bool {
        self.damage < 0.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WeaponFile {
    #[serde(default)]
    weapons: HashMap<String, WeaponSpec>,
}

/// The loaded catalog. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct WeaponSpecDb {
    weapons: HashMap<String, WeaponSpec>,
}

impl WeaponSpecDb {
    /// Load `data/config/weapons.toml`, keeping only records that pass
    /// validation. Falls back to the builtin set when the file is absent.
    pub fn load_default() -> Result<Self> {
        let rel = std::path::Path::new("config/weapons.toml");
        if loader::data_root().join(rel).is_file() {
            let file: WeaponFile = loader::load_toml(rel)?;
            Ok(Self::from_records(file.weapons))
        } else {
            Ok(Self::builtin())
        }
    }

    /// Build a catalog from raw records, dropping invalid ones with a warning.
    pub fn from_records(records: HashMap<String, WeaponSpec>) -> Self {
        let mut weapons = HashMap::with_capacity(records.len());
        for (id, spec) in records {
            match spec.validate(&id) {
                Ok(()) => {
                    weapons.insert(id, spec);
                }
                Err(e) => log::warn!("weapons: dropping invalid definition: {e}"),
            }
        }
        Self { weapons }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&WeaponSpec> {
        self.weapons.get(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.weapons.keys().map(|s| s.as_str())
    }

    /// Minimal survival loadout used when no data file is present.
    pub fn builtin() -> Self {
        let mut weapons = HashMap::new();
        weapons.insert(
            "hatchet".to_string(),
            WeaponSpec {
                range_m: 2.2,
                damage: 18.0,
                cooldown_s: 0.8,
                telegraph_s: 0.3,
                invuln_class: Some("melee_light".to_string()),
                invuln_window_s: 0.4,
                ..WeaponSpec::default()
            },
        );
        weapons.insert(
            "hunting_bow".to_string(),
            WeaponSpec {
                kind: WeaponKind::Projectile,
                range_m: 60.0,
                damage: 24.0,
                cooldown_s: 1.2,
                telegraph_s: 0.5,
                speed_mps: 45.0,
                invuln_class: Some("ranged".to_string()),
                invuln_window_s: 0.2,
                ..WeaponSpec::default()
            },
        );
        weapons.insert(
            "longrifle".to_string(),
            WeaponSpec {
                kind: WeaponKind::Hitscan,
                range_m: 120.0,
                damage: 35.0,
                cooldown_s: 2.0,
                telegraph_s: 0.2,
                requires_los: true,
                invuln_class: Some("ranged".to_string()),
                invuln_window_s: 0.2,
                ..WeaponSpec::default()
            },
        );
        weapons.insert(
            "frag_charge".to_string(),
            WeaponSpec {
                kind: WeaponKind::Aoe,
                range_m: 25.0,
                damage: 40.0,
                cooldown_s: 6.0,
                telegraph_s: 0.8,
                speed_mps: 18.0,
                radius_m: 6.0,
                falloff: true,
                max_targets: Some(8),
                target_filter: TargetFilter::All,
                arm_after_s: 0.15,
                invuln_class: Some("explosive".to_string()),
                invuln_window_s: 0.5,
                ..WeaponSpec::default()
            },
        );
        weapons.insert(
            "mending_salve".to_string(),
            WeaponSpec {
                kind: WeaponKind::Aoe,
                range_m: 0.0,
                damage: -12.0,
                cooldown_s: 8.0,
                telegraph_s: 0.4,
                radius_m: 8.0,
                duration_s: 5.0,
                tick_interval_s: 1.0,
                target_filter: TargetFilter::Allies,
                ..WeaponSpec::default()
            },
        );
        Self { weapons }
    }
}
