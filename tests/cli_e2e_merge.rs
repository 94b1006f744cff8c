//! E2E tests for the `merge` and `classify` commands.
//!
//! These tests invoke the actual CLI binary and validate merge behavior from a
//! user's perspective.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn test_cli_merge_json_to_stdout() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    lhs.write_str(r#"{"name": "api", "ports": [80], "env": {"LOG": "info"}}"#)
        .unwrap();
    rhs.write_str(r#"{"ports": [443], "env": {"DEBUG": "1"}, "region": "eu"}"#)
        .unwrap();

    let output = cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "name": "api",
            "ports": [80, 443],
            "env": {"LOG": "info", "DEBUG": "1"},
            "region": "eu"
        })
    );
}

#[test]
fn test_cli_merge_conflicting_scalars_become_pairs() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.yaml");
    let rhs = temp.child("rhs.yaml");
    lhs.write_str("version: 1\n").unwrap();
    rhs.write_str("version: 2\n").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .success()
        .stdout("version:\n- 1\n- 2\n");
}

#[test]
fn test_cli_merge_with_merger_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.yaml");
    let rhs = temp.child("rhs.yaml");
    lhs.write_str("hits: 3\nname: a\n").unwrap();
    rhs.write_str("hits: 4\nname: b\n").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .arg("--merger")
        .arg("int,int=sum")
        .arg("--merger")
        .arg("str,str=concat")
        .assert()
        .success()
        .stdout("hits: 7\nname: ab\n");
}

#[test]
fn test_cli_merge_toml_to_output_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("Cargo.toml");
    let rhs = temp.child("overlay.toml");
    let out = temp.child("merged.toml");
    lhs.write_str("[package]\nname = \"demo\"\n").unwrap();
    rhs.write_str("[package]\nedition = \"2021\"\n").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    out.assert("[package]\nname = \"demo\"\nedition = \"2021\"\n");
}

#[test]
fn test_cli_merge_with_settings_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let settings = temp.child("merge.yaml");
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    settings
        .write_str(
            r#"
mergers:
  - lhs: int
    rhs: int
    strategy: max
"#,
        )
        .unwrap();
    lhs.write_str(r#"{"timeout": 30, "retries": [1, 5]}"#).unwrap();
    rhs.write_str(r#"{"timeout": 10, "retries": [3]}"#).unwrap();

    let output = cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .arg("--settings")
        .arg(settings.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!({"timeout": 30, "retries": [3, 5]}));
}

#[test]
fn test_cli_merge_stop_on_keeps_lists_side_by_side() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    lhs.write_str(r#"{"tags": ["a"]}"#).unwrap();
    rhs.write_str(r#"{"tags": ["b"]}"#).unwrap();

    let output = cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .arg("--stop-on")
        .arg("list@1")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!({"tags": [["a"], ["b"]]}));
}

#[test]
fn test_cli_merge_mapping_with_scalar_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    lhs.write_str(r#"{"server": {"host": "a"}}"#).unwrap();
    rhs.write_str(r#"{"server": "b"}"#).unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot merge basic types"))
        .stderr(predicate::str::contains("server"));
}

#[test]
fn test_cli_merge_top_level_scalars_fail() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    lhs.write_str("1").unwrap();
    rhs.write_str("2").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No merge behavior provided"));
}

#[test]
fn test_cli_merge_unknown_extension_needs_format() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.conf");
    let rhs = temp.child("rhs.conf");
    lhs.write_str(r#"{"a": 1}"#).unwrap();
    rhs.write_str(r#"{"b": 2}"#).unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--format"));

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"b\": 2"));
}

#[test]
fn test_cli_merge_rejects_bad_rules() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    lhs.write_str("{}").unwrap();
    rhs.write_str("{}").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .arg("--merger")
        .arg("int,int=average")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown strategy"));
}

#[test]
fn test_cli_merge_missing_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    lhs.write_str("{}").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("merge")
        .arg(lhs.path())
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_cli_merge_debug_log_reports_conflicts() {
    let temp = assert_fs::TempDir::new().unwrap();
    let lhs = temp.child("lhs.json");
    let rhs = temp.child("rhs.json");
    lhs.write_str(r#"{"outer": {"inner": 1}}"#).unwrap();
    rhs.write_str(r#"{"outer": {"inner": 2}}"#).unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("--log-level")
        .arg("debug")
        .arg("merge")
        .arg(lhs.path())
        .arg(rhs.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("outer.inner"));
}

#[test]
fn test_cli_classify_document() {
    let temp = assert_fs::TempDir::new().unwrap();
    let doc = temp.child("doc.yaml");
    doc.write_str("name: api\nports: [80]\nenv: {}\n").unwrap();

    cargo_bin_cmd!("structmerge")
        .arg("classify")
        .arg(doc.path())
        .assert()
        .success()
        .stdout("<root>\tmapping-like\nname\tscalar\nports\tsequence-like\nenv\tmapping-like\n");
}

#[test]
fn test_cli_version() {
    cargo_bin_cmd!("structmerge")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("structmerge"));
}
