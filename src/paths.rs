//! Directory layout helpers
//!
//! <fixtures>/
//! ├── pipelines/      # cases built with osbuild, then inspected
//! │   └── *.json
//! └── images/         # cases downloaded from a URL, then inspected
//!     └── *.json
//!
//! <store>/
//! └── refs/
//!     └── <output_id>/
//!         └── <assembler filename>

use std::path::{Path, PathBuf};

/// Name of the project-local config file
pub const PROJECT_CONFIG_FILE: &str = "image-info-harness.toml";

/// Prefix for build store directories created under the scratch dir
pub const STORE_PREFIX: &str = "osbuild-composer-test-";

/// Default fixture root, relative to the working directory
pub fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("test").join("image-info")
}

/// Default scratch location for build stores and downloads.
/// /var/tmp is disk-backed, unlike /tmp on many systems.
pub fn default_scratch_dir() -> PathBuf {
    let var_tmp = Path::new("/var/tmp");
    if var_tmp.is_dir() {
        var_tmp.to_path_buf()
    } else {
        std::env::temp_dir()
    }
}

/// User-level config file (~/.config/image-info-harness/config.toml)
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("image-info-harness").join("config.toml"))
}

/// Fixture directory for pipeline-based cases
pub fn pipelines_dir(fixtures: &Path) -> PathBuf {
    fixtures.join("pipelines")
}

/// Fixture directory for url-based cases
pub fn images_dir(fixtures: &Path) -> PathBuf {
    fixtures.join("images")
}

/// Location of a built artifact inside the store
pub fn artifact_path(store: &Path, output_id: &str, filename: &str) -> PathBuf {
    store.join("refs").join(output_id).join(filename)
}

/// Resolve a path against the current directory without touching the filesystem
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
