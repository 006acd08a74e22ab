//! combat-harness: run a scripted skirmish scenario through the combat core
//! and print the outcome log.
//!
//! Usage:
//!   cargo run -p combat-harness -- scenario/skirmish.toml

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;

use combat_core::{
    ActorId, Aim, AttackRequest, CombatRules, CombatState, HitLocation, OwnerId, Stats,
};
use data_runtime::scenario::{Scenario, ScenarioAttack, load_scenario};

#[derive(Parser)]
#[command(about = "Run a scripted combat scenario and print the outcome log")]
struct Args {
    /// Scenario path relative to data/, e.g. scenario/skirmish.toml
    #[arg(default_value = "scenario/skirmish.toml")]
    scenario: String,
    /// Override the scenario seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Print only the final summary.
    #[arg(long)]
    summary_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let telem = data_runtime::configs::telemetry::load_default().unwrap_or_default();
    let _guard = combat_core::telemetry::init_telemetry(&telem)?;
    let scen = load_scenario(&args.scenario)?;
    let seed = args.seed.or(scen.seed).unwrap_or(42);
    let mut state = CombatState::new(seed);
    state.set_rules(CombatRules::survival_default(scen.pvp_enabled));
    let names = spawn_cast(&mut state, &scen)?;
    for ob in &scen.obstacles {
        state.add_obstacle(Vec3::from(ob.min), Vec3::from(ob.max));
    }

    let mut attacks: Vec<&ScenarioAttack> = scen.attacks.iter().collect();
    attacks.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
    let dt = scen.tick_s.unwrap_or(0.05);
    let steps = (scen.duration_s / dt).ceil() as usize;
    let mut cursor = 0usize;
    for _ in 0..steps {
        let now = state.time_s();
        while cursor < attacks.len() && f64::from(attacks[cursor].at_s) <= now {
            match build_request(attacks[cursor], &names, &state) {
                Ok(req) => state.resolve_attack(req),
                Err(e) => tracing::warn!("skipping scripted attack: {e}"),
            }
            cursor += 1;
        }
        state.step_authoritative(dt);
        if !args.summary_only {
            for ev in state.drain_outcomes() {
                tracing::info!(target: "outcome", ?ev, "outcome");
            }
        }
    }

    let mut cast: Vec<(&str, ActorId)> = names.iter().map(|(n, id)| (n.as_str(), *id)).collect();
    cast.sort();
    for (name, id) in cast {
        match state.ecs.get(id) {
            Some(a) => println!("final hp: {name} => {}/{}", a.hp.hp, a.hp.max),
            None => println!("final hp: {name} => despawned"),
        }
    }
    Ok(())
}

fn spawn_cast(state: &mut CombatState, scen: &Scenario) -> Result<HashMap<String, ActorId>> {
    let mut names = HashMap::new();
    for a in &scen.actors {
        let pos = Vec3::from(a.pos);
        let id = match a.kind.as_str() {
            "player" => state.spawn_player(OwnerId(a.owner.unwrap_or(0)), pos, a.hp),
            "creature" => state.spawn_creature(pos, a.radius_m.unwrap_or(0.9), a.hp),
            other => anyhow::bail!("actor '{}': unknown kind '{other}'", a.name),
        };
        if let Some(s) = a.stats {
            state.set_stats(
                id,
                Stats {
                    strength: s.strength,
                    defense: s.defense,
                    accuracy: s.accuracy,
                    agility: s.agility,
                    critical: s.critical,
                },
            );
        }
        names.insert(a.name.clone(), id);
    }
    Ok(names)
}

fn build_request(
    atk: &ScenarioAttack,
    names: &HashMap<String, ActorId>,
    state: &CombatState,
) -> Result<AttackRequest> {
    let attacker = *names
        .get(&atk.attacker)
        .with_context(|| format!("unknown attacker '{}'", atk.attacker))?;
    let origin = state
        .ecs
        .get(attacker)
        .map(|a| a.tr.pos)
        .context("attacker despawned")?;
    let aim = if let Some(t) = &atk.target {
        Aim::Target(*names.get(t).with_context(|| format!("unknown target '{t}'"))?)
    } else if let Some(d) = atk.dir {
        Aim::Dir(Vec3::from(d))
    } else if let Some(p) = atk.point {
        Aim::Point(Vec3::from(p))
    } else {
        // Self-centered area casts need no aim.
        Aim::Point(origin)
    };
    let hit_location = atk.hit_location.as_deref().and_then(HitLocation::parse);
    Ok(AttackRequest {
        attacker,
        weapon: atk.weapon.clone(),
        origin,
        aim,
        hit_location,
    })
}
