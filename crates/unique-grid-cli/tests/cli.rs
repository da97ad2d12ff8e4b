use assert_cmd::Command;
use predicates::prelude::*;

fn unique_grid() -> Command {
    Command::cargo_bin("unique-grid").expect("binary builds")
}

#[test]
fn generates_grid_with_explicit_shape() {
    unique_grid()
        .args(["--rows", "4", "--cols", "4", "--patch-size", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("patch_size = 3"))
        .stdout(predicate::str::contains("fingerprint = "));
}

#[test]
fn json_output_carries_the_renderer_contract() {
    let assert = unique_grid()
        .args(["-r", "4", "-c", "4", "-p", "3", "--json"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON on stdout");
    assert_eq!(value["grid"]["spec"]["rows"], 4);
    assert_eq!(value["grid"]["spec"]["cols"], 4);
    assert_eq!(value["grid"]["spec"]["patch_size"], 3);
    assert_eq!(
        value["grid"]["cells"].as_array().map(Vec::len),
        Some(16)
    );
    assert!(value["fingerprint"].is_string());
}

#[test]
fn escalates_patch_size_until_a_grid_exists() {
    // 4x4 with patch 2 exhausts; patch 3 succeeds.
    unique_grid()
        .args(["-r", "4", "-c", "4", "-p", "2", "--max-patch-size", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("patch_size = 3"));
}

#[test]
fn rejects_invalid_parameters() {
    unique_grid()
        .args(["--rows", "2", "--cols", "2", "--patch-size", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot hold"));
}

#[test]
fn reports_exhaustion_without_escalation() {
    unique_grid()
        .args(["-r", "4", "-c", "4", "-p", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no grid satisfies"));
}

#[test]
fn rejects_unknown_log_level() {
    unique_grid()
        .args(["--log-level", "chatty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized log level"));
}
