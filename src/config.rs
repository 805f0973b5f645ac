//! Configuration management for image-info-harness
//!
//! Lookup order: `--config <path>`, then ./image-info-harness.toml, then
//! ~/.config/image-info-harness/config.toml, then built-in defaults.
//! `OSBUILD_TEST_BUILD_PIPELINE` overrides `osbuild.build_pipeline`.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate build pipeline for osbuild
pub const BUILD_PIPELINE_ENV: &str = "OSBUILD_TEST_BUILD_PIPELINE";

/// Global harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Leave the build store on disk after the run
    pub keep_store: bool,
    pub osbuild: OsbuildConfig,
    pub image_info: ImageInfoConfig,
    pub paths: PathsConfig,
    pub download: DownloadConfig,
}

/// How to invoke the build tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsbuildConfig {
    /// Interpreter used to run `-m osbuild`
    pub python: String,
    /// Passed as `--libdir`, relative to `workdir`
    pub libdir: String,
    /// Working directory for the build tool (an osbuild checkout)
    pub workdir: PathBuf,
    /// Optional `--build-pipeline` override
    pub build_pipeline: Option<PathBuf>,
}

impl Default for OsbuildConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            libdir: ".".to_string(),
            workdir: PathBuf::from("osbuild"),
            build_pipeline: None,
        }
    }
}

/// How to invoke the inspection tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInfoConfig {
    pub program: PathBuf,
}

impl Default for ImageInfoConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tools").join("image-info"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root holding the `pipelines/` and `images/` fixture directories
    pub fixtures: PathBuf,
    /// Where build stores and downloaded images are created
    pub scratch: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            fixtures: paths::default_fixtures_dir(),
            scratch: paths::default_scratch_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Overall timeout for one image download
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

impl Config {
    /// Load configuration, falling back through the lookup order.
    /// An explicit path must exist; the implicit ones are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_implicit()?,
        };

        config.apply_build_pipeline_override(std::env::var(BUILD_PIPELINE_ENV).ok());
        Ok(config)
    }

    fn load_implicit() -> Result<Self> {
        let project = PathBuf::from(paths::PROJECT_CONFIG_FILE);
        if project.exists() {
            return Self::load_from_file(&project);
        }

        if let Some(user) = paths::user_config_file() {
            if user.exists() {
                return Self::load_from_file(&user);
            }
        }

        Ok(Config::default())
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply the value of `OSBUILD_TEST_BUILD_PIPELINE`; empty means unset
    pub fn apply_build_pipeline_override(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.osbuild.build_pipeline = Some(PathBuf::from(value));
        }
    }
}
