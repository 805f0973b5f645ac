//! Pipeline-based cases
//!
//! Verifies that a case with `pipeline` and `expected`:
//! - builds once into the shared store
//! - inspects `<store>/refs/<output_id>/<filename>`
//! - passes or fails on deep equality
//! - leaves no store behind

#![cfg(unix)]

use super::harness::{harness, harness_with_env, FakeTools, Fixture, HarnessAssertions};
use std::collections::HashMap;

/// image-info output matching pipelines-basic/pipelines/disk.json, keys reordered
const DISK_INFO: &str = r#"{
  "bootmenu": [],
  "partitions": [
    { "start": 1048576, "size": 3220176896, "label": null, "fstype": "ext4", "bootable": true }
  ],
  "partition-table": "dos",
  "image-format": "raw"
}"#;

#[test]
fn matching_build_passes_and_releases_store() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    fixture.install_tools(&FakeTools::echoing(DISK_INFO));

    let result = harness(&fixture, &["run", "--category", "pipelines"]);

    result.assert_success();
    result.assert_case_passed("pipelines/disk");
    result.assert_case_skipped("pipelines/todo");
    assert!(result.stdout_contains("1 passed, 0 failed, 1 skipped"));

    assert_eq!(fixture.calls_to("osbuild").len(), 1);
    let inspections = fixture.calls_to("image-info");
    assert_eq!(inspections.len(), 1);
    assert!(
        inspections[0].ends_with("/refs/o1/disk.img"),
        "unexpected inspection target: {}",
        inspections[0]
    );

    assert!(
        fixture.scratch_entries().is_empty(),
        "store left behind: {:?}",
        fixture.scratch_entries()
    );
}

#[test]
fn build_uses_json_output_and_stdin_pipeline() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    fixture.install_tools(&FakeTools::echoing(DISK_INFO));

    harness(&fixture, &["run", "--category", "pipelines"]).assert_success();

    let builds = fixture.calls_to("osbuild");
    assert!(builds[0].contains("-m osbuild --json --libdir . --store "));
    assert!(builds[0].ends_with(" -"));
    assert!(!builds[0].contains("--build-pipeline"));
}

#[test]
fn mismatch_fails_with_visible_diff() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    let wrong = DISK_INFO.replace("\"ext4\"", "\"xfs\"");
    fixture.install_tools(&FakeTools::echoing(&wrong));

    let result = harness(&fixture, &["run"]);

    result.assert_failure();
    result.assert_case_failed("pipelines/disk");
    assert!(result.stderr_contains("$.partitions[0].fstype: expected \"ext4\", found \"xfs\""));
    assert!(result.stderr_contains("1 case(s) failed"));
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn failed_build_surfaces_diagnostics_and_skips_inspection() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    let tools = FakeTools {
        build_exit: 1,
        build_stderr: "stage org.osbuild.rpm failed".to_string(),
        ..FakeTools::echoing(DISK_INFO)
    };
    fixture.install_tools(&tools);

    let result = harness(&fixture, &["run"]);

    result.assert_failure();
    result.assert_case_failed("pipelines/disk");
    assert!(result.stdout_contains("osbuild exited with exit code 1"));
    assert!(result.stderr_contains("stage org.osbuild.rpm failed"));
    assert!(fixture.calls_to("image-info").is_empty());
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn build_pipeline_env_is_forwarded_as_absolute_path() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    fixture.install_tools(&FakeTools::echoing(DISK_INFO));

    let mut env = HashMap::new();
    env.insert(
        "OSBUILD_TEST_BUILD_PIPELINE".to_string(),
        "build-pipeline.json".to_string(),
    );
    let result = harness_with_env(&fixture, &["run", "--category", "pipelines"], env);

    result.assert_success();
    let builds = fixture.calls_to("osbuild");
    let flag = builds[0]
        .split_once("--build-pipeline ")
        .map(|(_, path)| path.to_string())
        .unwrap_or_else(|| panic!("no --build-pipeline in: {}", builds[0]));
    assert!(flag.starts_with('/'), "not absolute: {}", flag);
    assert!(flag.ends_with("/build-pipeline.json"));
}

#[test]
fn keep_store_leaves_artifacts() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    fixture.install_tools(&FakeTools::echoing(DISK_INFO));

    let result = harness(&fixture, &["run", "--keep-store"]);

    result.assert_success();
    assert!(result.stdout_contains("Build store kept at"));
    let entries = fixture.scratch_entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].join("refs/o1/disk.img").is_file());
}

#[test]
fn json_report_lists_every_case() {
    let fixture = Fixture::load_mutable("pipelines-basic");
    fixture.install_tools(&FakeTools::echoing(DISK_INFO));

    let result = harness(&fixture, &["run", "--json"]);
    result.assert_success();

    let report: serde_json::Value =
        serde_json::from_str(&result.stdout).expect("stdout should be JSON");
    let cases = report["cases"].as_array().expect("cases array");
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0]["name"], "disk");
    assert_eq!(cases[0]["outcome"]["status"], "passed");
    assert_eq!(cases[1]["name"], "todo");
    assert_eq!(cases[1]["outcome"]["status"], "skipped");
    assert_eq!(report["cancelled"], false);
}
