//! Url-based cases
//!
//! Verifies that a case with `url` and `expected`:
//! - downloads the image to a temp file and inspects that file
//! - passes or fails on deep equality
//! - removes the downloaded file whatever the outcome

#![cfg(unix)]

use super::harness::{harness, serve_once, FakeTools, Fixture, HarnessAssertions};

#[test]
fn downloaded_image_is_inspected_and_removed() {
    let fixture = Fixture::empty();
    fixture.install_tools(&FakeTools::echoing("{}"));
    let url = serve_once("200 OK", r#"{"size": 1024}"#.to_string());
    fixture.write_case(
        "images",
        "remote",
        &format!(r#"{{"url": "{}", "expected": {{"size": 1024}}}}"#, url),
    );

    let result = harness(&fixture, &["run", "--category", "images"]);

    result.assert_success();
    result.assert_case_passed("images/remote");

    let inspections = fixture.calls_to("image-info");
    assert_eq!(inspections.len(), 1);
    assert!(inspections[0].ends_with(".raw"));
    assert!(fixture.calls_to("osbuild").is_empty());
    assert!(
        fixture.scratch_entries().is_empty(),
        "download left behind: {:?}",
        fixture.scratch_entries()
    );
}

#[test]
fn mismatch_reports_diff_and_removes_download() {
    let fixture = Fixture::empty();
    fixture.install_tools(&FakeTools::echoing("{}"));
    let url = serve_once("200 OK", r#"{"size": 2048}"#.to_string());
    fixture.write_case(
        "images",
        "remote",
        &format!(r#"{{"url": "{}", "expected": {{"size": 1024}}}}"#, url),
    );

    let result = harness(&fixture, &["run"]);

    result.assert_failure();
    result.assert_case_failed("images/remote");
    assert!(result.stderr_contains("$.size: expected 1024, found 2048"));
    assert!(fixture.scratch_entries().is_empty());
}

#[test]
fn http_error_fails_only_that_case() {
    let fixture = Fixture::empty();
    fixture.install_tools(&FakeTools::echoing("{}"));
    let missing = serve_once("404 Not Found", "gone".to_string());
    let present = serve_once("200 OK", "{}".to_string());
    fixture.write_case(
        "images",
        "a-missing",
        &format!(r#"{{"url": "{}", "expected": {{}}}}"#, missing),
    );
    fixture.write_case(
        "images",
        "b-present",
        &format!(r#"{{"url": "{}", "expected": {{}}}}"#, present),
    );

    let result = harness(&fixture, &["run"]);

    result.assert_failure();
    result.assert_case_failed("images/a-missing");
    assert!(result.stdout_contains("HTTP 404"));
    result.assert_case_passed("images/b-present");
    assert!(fixture.scratch_entries().is_empty());
}
