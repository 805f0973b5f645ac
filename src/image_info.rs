//! Inspection runner: `image-info <image>` -> JSON

use crate::config::ImageInfoConfig;
use crate::error::HarnessError;
use crate::util::process::{CommandRunner, CommandSpec};
use serde_json::Value;
use std::path::{Path, PathBuf};

const TOOL: &str = "image-info";

pub struct ImageInfo<'a> {
    program: &'a Path,
    runner: &'a dyn CommandRunner,
}

impl<'a> ImageInfo<'a> {
    pub fn new(config: &'a ImageInfoConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            program: &config.program,
            runner,
        }
    }

    /// Resolve the inspection tool before any case runs.
    /// Bare names are looked up on PATH; anything with a separator must exist.
    pub fn locate(&self) -> Result<PathBuf, HarnessError> {
        let is_bare = self.program.components().count() == 1 && !self.program.is_absolute();
        if is_bare {
            return which::which(self.program).map_err(|_| HarnessError::Io {
                context: format!("{} not found on PATH", self.program.display()),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        if self.program.is_file() {
            Ok(self.program.to_path_buf())
        } else {
            Err(HarnessError::Io {
                context: format!("{} not found", self.program.display()),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    /// Inspect one image file
    pub fn inspect(&self, image: &Path) -> Result<Value, HarnessError> {
        let spec = CommandSpec::new(self.program).arg(image);
        let _span = tracing::info_span!("image-info", image = %image.display()).entered();

        let output = self.runner.execute(&spec)?;

        if !output.success() {
            return Err(HarnessError::Execution {
                tool: TOOL.to_string(),
                status: output.exit_code,
                stderr: output.stderr,
            });
        }

        serde_json::from_str(&output.stdout).map_err(|e| HarnessError::InvalidOutput {
            tool: TOOL.to_string(),
            reason: format!("not JSON: {}", e),
            stderr: output.stderr,
        })
    }
}
