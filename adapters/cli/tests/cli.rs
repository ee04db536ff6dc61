use std::{fs, path::PathBuf, process::Command};

use firewall_defence_core::{RunState, SessionSnapshot};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_firewall-defence"))
}

fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn json_output_is_a_session_snapshot() {
    let output = binary()
        .args(["--seed", "3", "--ticks", "200", "--tower", "proxy@120,200", "--json"])
        .output()
        .expect("failed to run firewall-defence");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let snapshot: SessionSnapshot =
        serde_json::from_slice(&output.stdout).expect("stdout holds a snapshot");
    assert_eq!(snapshot.run_state, RunState::Running);
    assert!(snapshot.wave >= 1);
    assert_eq!(snapshot.stats.towers_built, 1);
}

#[test]
fn bundled_scenario_prints_a_summary() {
    let output = binary()
        .arg("--scenario")
        .arg(scenario("opening.toml"))
        .args(["--ticks", "400"])
        .output()
        .expect("failed to run firewall-defence");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("state:"), "{stdout}");
    assert!(stdout.contains("waves:"), "{stdout}");
}

#[test]
fn unsupported_scenario_version_fails() {
    let dir = std::env::temp_dir().join(format!("firewall-defence-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("future.toml");
    fs::write(&path, "version = 9\n").expect("write scenario");

    let output = binary()
        .arg("--scenario")
        .arg(&path)
        .output()
        .expect("failed to run firewall-defence");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported scenario version 9"), "{stderr}");
}

#[test]
fn malformed_tower_flag_is_reported() {
    let output = binary()
        .args(["--tower", "proxy@abc,10"])
        .output()
        .expect("failed to run firewall-defence");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid coordinate `abc`"), "{stderr}");
}
