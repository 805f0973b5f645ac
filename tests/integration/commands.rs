//! Auxiliary commands: list, build, inspect, help

#![cfg(unix)]

use super::harness::{harness, source_dir, FakeTools, Fixture, HarnessAssertions};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn list_shows_status_per_case() {
    let fixture = Fixture::load_mutable("pipelines-basic");

    let result = harness(&fixture, &["list"]);

    result.assert_success();
    assert!(result.stdout_contains("✓ pipelines/disk"));
    assert!(result.stdout_contains("- pipelines/todo (skipped: no expected value)"));
}

#[test]
fn list_json_is_machine_readable() {
    let fixture = Fixture::load_mutable("unspecified");

    let result = harness(&fixture, &["list", "--json"]);
    result.assert_success();

    let listed: serde_json::Value = serde_json::from_str(&result.stdout).expect("JSON");
    let names: Vec<&str> = listed
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["ostree", "fedora-cloud"]);
    assert_eq!(listed[0]["runnable"], false);
}

#[test]
fn build_named_pipeline_prints_ids() {
    let fixture = Fixture::empty();
    fixture.install_tools(&FakeTools::echoing("tree"));
    let pipeline = fixture.path.join("base.json");
    fs::copy(source_dir("named-pipeline").join("base.json"), &pipeline).unwrap();
    let store = fixture.path.join("store");

    let result = harness(
        &fixture,
        &["build", "base.json", "--store", "store", "--json"],
    );

    result.assert_success();
    let built: serde_json::Value = serde_json::from_str(&result.stdout).expect("JSON");
    assert_eq!(built["tree_id"], "t1");
    assert_eq!(built["output_id"], "o1");

    let builds = fixture.calls_to("osbuild");
    assert_eq!(builds.len(), 1);
    assert!(builds[0].ends_with("/base.json"));
    assert!(store.join("refs/o1/tree.tar").is_file());
}

#[test]
fn build_failure_shows_osbuild_output() {
    let fixture = Fixture::empty();
    let tools = FakeTools {
        build_exit: 2,
        build_stderr: "no such stage".to_string(),
        ..FakeTools::echoing("")
    };
    fixture.install_tools(&tools);
    fs::copy(
        source_dir("named-pipeline").join("base.json"),
        fixture.path.join("base.json"),
    )
    .unwrap();

    let result = harness(&fixture, &["build", "base.json", "--store", "store"]);

    result.assert_error_contains("osbuild exited with exit code 2");
    assert!(result.stderr_contains("no such stage"));
}

#[test]
fn inspect_prints_image_info_json() {
    let fixture = Fixture::empty();
    fixture.install_tools(&FakeTools::echoing(""));
    let image = fixture.path.join("disk.img");
    fs::write(&image, r#"{"image-format": "qcow2"}"#).unwrap();

    let result = harness(&fixture, &["inspect", "disk.img"]);

    result.assert_success();
    let info: serde_json::Value = serde_json::from_str(&result.stdout).expect("JSON");
    assert_eq!(info["image-format"], "qcow2");
}

#[test]
fn inspect_failure_is_reported() {
    let fixture = Fixture::empty();
    let tools = FakeTools {
        inspect_exit: 1,
        ..FakeTools::echoing("")
    };
    fixture.install_tools(&tools);
    fs::write(fixture.path.join("disk.img"), "garbage").unwrap();

    let result = harness(&fixture, &["inspect", "disk.img"]);

    result.assert_error_contains("image-info exited with exit code 1");
    assert!(result.stderr_contains("cannot inspect"));
}

#[test]
fn help_command_always_works() {
    let fixture = Fixture::empty();

    Command::cargo_bin("image-info-harness")
        .unwrap()
        .current_dir(&fixture.path)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn unknown_category_is_rejected() {
    Command::cargo_bin("image-info-harness")
        .unwrap()
        .args(["run", "--category", "containers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'containers'"));
}
