use std::process::Command;

#[test]
fn presets_lists_the_known_names() {
    let out = Command::new(env!("CARGO_BIN_EXE_kinetica"))
        .arg("presets")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    for name in ["intro", "home-shapes", "navigation", "overlay-particles"] {
        assert!(stdout.contains(name), "missing preset '{name}'");
    }
}

#[test]
fn simulate_intro_emits_json_frames() {
    let out = Command::new(env!("CARGO_BIN_EXE_kinetica"))
        .args([
            "simulate",
            "--preset",
            "intro",
            "--until-ms",
            "7000",
            "--step-ms",
            "1000",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(frames.len(), 8);
    assert_eq!(frames[0]["phase"], "pulse");
    assert_eq!(frames[7]["sequence_complete"], true);
}

#[test]
fn simulate_rejects_unknown_presets() {
    let out = Command::new(env!("CARGO_BIN_EXE_kinetica"))
        .args(["simulate", "--preset", "nope"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}
