//! Harness scenario schema: a small cast of combatants plus a scripted
//! attack timeline, loaded from `data/scenario/*.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::loader;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub tick_s: Option<f32>,
    pub duration_s: f32,
    #[serde(default)]
    pub pvp_enabled: bool,
    #[serde(default)]
    pub actors: Vec<ScenarioActor>,
    #[serde(default)]
    pub attacks: Vec<ScenarioAttack>,
    #[serde(default)]
    pub obstacles: Vec<ScenarioObstacle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioActor {
    pub name: String,
    /// "player" or "creature".
    pub kind: String,
    #[serde(default)]
    pub owner: Option<u32>,
    pub pos: [f32; 3],
    pub hp: i32,
    #[serde(default)]
    pub radius_m: Option<f32>,
    #[serde(default)]
    pub stats: Option<ScenarioStats>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioStats {
    pub strength: f32,
    pub defense: f32,
    pub accuracy: f32,
    pub agility: f32,
    pub critical: f32,
}

/// One scripted attack. Exactly one of `target`, `dir`, `point` should be
/// set; the harness maps it onto the request's aim.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioAttack {
    pub at_s: f32,
    pub attacker: String,
    pub weapon: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub dir: Option<[f32; 3]>,
    #[serde(default)]
    pub point: Option<[f32; 3]>,
    #[serde(default)]
    pub hit_location: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScenarioObstacle {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

pub fn load_scenario(rel: impl AsRef<std::path::Path>) -> Result<Scenario> {
    let rel = rel.as_ref();
    let scen: Scenario = loader::load_toml(rel).with_context(|| format!("load scenario {}", rel.display()))?;
    if scen.duration_s <= 0.0 {
        anyhow::bail!("scenario {}: duration_s must be positive", rel.display());
    }
    Ok(scen)
}
