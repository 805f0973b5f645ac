//! Test harness for image-info-harness integration tests
//!
//! Provides throwaway workspaces with fake osbuild/image-info scripts,
//! binary execution, and custom assertions for end-to-end CLI behavior.


pub use assertions::HarnessAssertions;
pub use fixture::{source_dir, FakeTools, Fixture};
pub use runner::{harness, harness_with_env, RunResult};
pub use server::serve_once;
