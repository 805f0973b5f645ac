//! Cases without `expected`
//!
//! Verifies that unspecified cases are reported as skipped and never
//! reach osbuild, the network, or image-info.

#![cfg(unix)]

use super::harness::{harness, FakeTools, Fixture, HarnessAssertions};

#[test]
fn unspecified_cases_skip_without_tool_calls() {
    let fixture = Fixture::load_mutable("unspecified");
    fixture.install_tools(&FakeTools::echoing("{}"));

    let result = harness(&fixture, &["run"]);

    result.assert_success();
    result.assert_case_skipped("pipelines/ostree");
    result.assert_case_skipped("images/fedora-cloud");
    assert!(result.stdout_contains("0 passed, 0 failed, 2 skipped"));
    assert!(fixture.calls().is_empty(), "tools ran: {:?}", fixture.calls());
}

#[test]
fn filter_narrows_the_run() {
    let fixture = Fixture::load_mutable("unspecified");
    fixture.install_tools(&FakeTools::echoing("{}"));

    let result = harness(&fixture, &["run", "--filter", "ostree"]);

    result.assert_success();
    result.assert_case_skipped("pipelines/ostree");
    assert!(!result.stdout_contains("fedora-cloud"));
}
