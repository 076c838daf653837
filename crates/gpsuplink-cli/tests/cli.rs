use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gpsuplink"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn golden(case: &str) -> std::path::PathBuf {
    repo_root().join("tests").join("golden").join(case)
}

fn sample_input() -> std::path::PathBuf {
    golden("san_francisco").join("input.json")
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_lists_decode() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("decode"));
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.json");
    let output = temp.path().join("output.json");

    cmd()
        .arg("decode")
        .arg(missing)
        .arg("-o")
        .arg(output)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_host_shape() {
    let assert = cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(
        value,
        serde_json::json!({ "data": { "lat": 37.7749, "long": -122.4194 } })
    );
}

#[test]
fn hex_payload_decodes() {
    let assert = cmd()
        .arg("decode")
        .arg("--hex")
        .arg("d0d556ec2fe34240 50fc1873d79a5ec0")
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value["data"]["lat"], 37.7749);
    assert_eq!(value["data"]["long"], -122.4194);
}

#[test]
fn short_payload_is_malformed() {
    cmd()
        .arg("decode")
        .arg("--hex")
        .arg("d0d556ec2fe3424050fc1873d79a5e")
        .arg("--stdout")
        .assert()
        .failure()
        .code(2)
        .stdout(predicates::str::is_empty())
        .stderr(contains("malformed payload: need 16 bytes, got 15").and(contains("hint:")));
}

#[test]
fn invalid_hex_is_rejected() {
    cmd()
        .arg("decode")
        .arg("--hex")
        .arg("zz")
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("invalid hex payload"));
}

#[test]
fn invalid_json_input_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("input.json");
    fs::write(&input, r#"{"bytes":[300]}"#).expect("write input");

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("invalid uplink input").and(contains("hint:")));
}

#[test]
fn stdout_and_output_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("output.json");

    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .arg("-o")
        .arg(output)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("output.json");

    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("-o")
        .arg(output)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn output_file_matches_golden() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("nested").join("output.json");

    cmd()
        .arg("decode")
        .arg(golden("trailing_bytes").join("input.json"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("OK: output written"));

    let actual: Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read output")).expect("json");
    let expected: Value = serde_json::from_str(
        &fs::read_to_string(golden("trailing_bytes").join("expected_output.json"))
            .expect("read expected"),
    )
    .expect("json");
    assert_eq!(actual, expected);
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("output.json");

    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("-o")
        .arg(output)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicates::str::contains("OK:").not());
}

#[test]
fn output_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("input.json");
    fs::copy(sample_input(), &input).expect("copy input");

    cmd()
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("output path must differ from input"));
}

#[test]
fn glob_with_multiple_matches_fails() {
    let pattern = repo_root()
        .join("tests")
        .join("golden")
        .join("*")
        .join("input.json");

    cmd()
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern"));
}

#[test]
fn glob_with_single_match_decodes() {
    let pattern = golden("zero_*").join("input.json");

    let assert = cmd()
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value["data"]["lat"], 0.0);
}

#[test]
fn list_violations_outputs_ids() {
    cmd()
        .arg("decode")
        .arg(golden("zero_payload").join("input.json"))
        .arg("--stdout")
        .arg("--list-violations")
        .assert()
        .success()
        .stderr(contains("Violations:").and(contains("GPS-NULL-ISLAND")));
}

#[test]
fn fport_override_is_checked() {
    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--fport")
        .arg("2")
        .arg("--var")
        .arg("model=t-beam")
        .arg("--stdout")
        .arg("--list-violations")
        .assert()
        .success()
        .stderr(contains("GPS-FPORT"));
}

#[test]
fn strict_fails_when_violations_present() {
    cmd()
        .arg("decode")
        .arg(golden("zero_payload").join("input.json"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("plausibility violations detected"));
}

#[test]
fn strict_passes_for_plausible_fix() {
    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn quiet_still_lists_violations() {
    cmd()
        .arg("decode")
        .arg(golden("zero_payload").join("input.json"))
        .arg("--stdout")
        .arg("--quiet")
        .arg("--list-violations")
        .assert()
        .success()
        .stderr(contains("Violations:").and(contains("GPS-NULL-ISLAND")));
}

#[test]
fn pretty_outputs_multiline_json() {
    let assert = cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .arg("--pretty")
        .assert()
        .success()
        .stdout(contains("{\n  \"data\": {\n    \"lat\": 37.7749"));
    let value = stdout_json(&assert);
    assert_eq!(value["data"]["long"], -122.4194);
}

#[test]
fn compact_is_single_line() {
    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .arg("--compact")
        .assert()
        .success()
        .stdout(contains("\n").not());
}

#[test]
fn default_log_level_is_silent_on_success() {
    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .assert()
        .success()
        .stderr(predicates::str::is_empty());
}

#[test]
fn verbose_logs_decoded_uplink() {
    cmd()
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .arg("-v")
        .assert()
        .success()
        .stderr(contains("uplink decoded").and(contains("decoding uplink").not()));
}

#[test]
fn rust_log_overrides_verbosity() {
    cmd()
        .env("RUST_LOG", "debug")
        .arg("decode")
        .arg(sample_input())
        .arg("--stdout")
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("decoding uplink").and(contains("uplink decoded")));
}
