//! Run-level failures
//!
//! Verifies that broken fixtures and missing tools abort the whole run
//! before any case executes.

#![cfg(unix)]

use super::harness::{harness, FakeTools, Fixture, HarnessAssertions};
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn malformed_fixture_aborts_run() {
    let fixture = Fixture::load_mutable("broken");
    fixture.install_tools(&FakeTools::echoing("{}"));

    let result = harness(&fixture, &["run"]);

    result.assert_error_contains("Failed to parse fixture");
    assert!(result.stderr_contains("broken.json"));
    assert!(fixture.calls().is_empty());
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn missing_image_info_aborts_run() {
    let fixture = Fixture::load_mutable("pipelines-basic");

    let result = harness(&fixture, &["run"]);

    result.assert_error_contains("Cannot run cases without image-info");
}

#[test]
fn empty_fixture_root_is_an_error() {
    let fixture = Fixture::empty();
    fixture.install_tools(&FakeTools::echoing("{}"));

    let result = harness(&fixture, &["run"]);

    result.assert_error_contains("No fixture cases found");
}

#[test]
fn missing_config_file_is_reported() {
    let fixture = Fixture::empty();

    Command::cargo_bin("image-info-harness")
        .unwrap()
        .current_dir(&fixture.path)
        .args(["list", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
