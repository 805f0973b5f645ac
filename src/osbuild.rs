//! Build runner: drives `python3 -m osbuild` against the shared store

use crate::config::OsbuildConfig;
use crate::error::HarnessError;
use crate::paths;
use crate::util::process::{CommandRunner, CommandSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const TOOL: &str = "osbuild";

/// Where osbuild reads the pipeline from
#[derive(Debug, Clone)]
pub enum PipelineSource {
    /// Streamed on stdin, with `-` as the pipeline argument
    Inline(Value),
    /// A named pipeline file on disk
    File(PathBuf),
}

/// Identifiers osbuild reports for a finished build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub tree_id: String,
    pub output_id: String,
}

impl BuildResult {
    /// Path of an assembled artifact: `<store>/refs/<output_id>/<filename>`
    pub fn artifact_path(&self, store: &Path, filename: &str) -> PathBuf {
        paths::artifact_path(store, &self.output_id, filename)
    }
}

pub struct Osbuild<'a> {
    config: &'a OsbuildConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Osbuild<'a> {
    pub fn new(config: &'a OsbuildConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Assemble the osbuild invocation for a pipeline
    pub fn command(
        &self,
        source: &PipelineSource,
        store: &Path,
    ) -> Result<CommandSpec, HarnessError> {
        // osbuild runs from its own checkout, so every path it gets is absolute
        let store = absolute(store)?;

        let mut spec = CommandSpec::new(&self.config.python)
            .args(["-m", "osbuild", "--json", "--libdir"])
            .arg(&self.config.libdir)
            .arg("--store")
            .arg(&store)
            .current_dir(&self.config.workdir);

        spec = match source {
            PipelineSource::Inline(pipeline) => {
                let input = serde_json::to_vec(pipeline).map_err(|e| HarnessError::InvalidFixture {
                    name: "pipeline".to_string(),
                    reason: e.to_string(),
                })?;
                spec.arg("-").stdin(input)
            }
            PipelineSource::File(path) => spec.arg(absolute(path)?),
        };

        if let Some(build_pipeline) = &self.config.build_pipeline {
            spec = spec.arg("--build-pipeline").arg(absolute(build_pipeline)?);
        }

        Ok(spec)
    }

    /// Run one build and return its identifiers.
    /// A failing build is an error; no result is made up for it.
    pub fn run(&self, source: &PipelineSource, store: &Path) -> Result<BuildResult, HarnessError> {
        let spec = self.command(source, store)?;
        let _span = tracing::info_span!("osbuild", store = %store.display()).entered();

        let output = self.runner.execute(&spec)?;

        if !output.success() {
            // osbuild --json reports failures on stdout, so keep both streams
            let mut diagnostics = output.stdout;
            if !output.stderr.trim().is_empty() {
                if !diagnostics.is_empty() && !diagnostics.ends_with('\n') {
                    diagnostics.push('\n');
                }
                diagnostics.push_str(&output.stderr);
            }
            return Err(HarnessError::Execution {
                tool: TOOL.to_string(),
                status: output.exit_code,
                stderr: diagnostics,
            });
        }

        let result = parse_build_result(&output.stdout).map_err(|reason| {
            HarnessError::InvalidOutput {
                tool: TOOL.to_string(),
                reason,
                stderr: output.stderr.clone(),
            }
        })?;

        tracing::debug!(tree_id = %result.tree_id, output_id = %result.output_id, "build finished");
        Ok(result)
    }
}

fn parse_build_result(stdout: &str) -> Result<BuildResult, String> {
    serde_json::from_str(stdout).map_err(|e| format!("expected tree_id and output_id: {}", e))
}

fn absolute(path: &Path) -> Result<PathBuf, HarnessError> {
    paths::absolute(path)
        .map_err(|e| HarnessError::io(format!("Failed to resolve {}", path.display()), e))
}
