use data_runtime::scenario::load_scenario;

#[test]
fn skirmish_scenario_parses() {
    let scen = load_scenario("scenario/skirmish.toml").expect("load skirmish");
    assert!(scen.duration_s > 0.0);
    assert!(scen.actors.iter().any(|a| a.kind == "player"));
    assert!(scen.actors.iter().any(|a| a.kind == "creature"));
    assert!(!scen.attacks.is_empty());
    // Every scripted attack references a cast member.
    for atk in &scen.attacks {
        assert!(scen.actors.iter().any(|a| a.name == atk.attacker), "unknown attacker {}", atk.attacker);
        if let Some(t) = &atk.target {
            assert!(scen.actors.iter().any(|a| &a.name == t), "unknown target {t}");
        }
    }
}
