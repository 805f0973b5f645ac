//! Fixture discovery and parsing
//!
//! A fixture is one `.json` file describing one case:
//!
//! ```json
//! {
//!   "pipeline": { "assembler": { "options": { "filename": "disk.img" } } },
//!   "url": "https://example.test/image.raw",
//!   "expected": { "...": "image-info output" }
//! }
//! ```
//!
//! Pipeline cases use `pipeline`, image cases use `url`. A case without
//! `expected` is not yet specified and gets skipped.

use crate::error::HarnessError;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const FIXTURE_EXTENSION: &str = "json";

/// Lazy iterator over `(name, parsed)` for every `.json` file in a directory
pub struct JsonFiles {
    dir: PathBuf,
    entries: fs::ReadDir,
}

/// Scan `dir` for fixture files. Order follows the directory listing.
pub fn json_files(dir: &Path) -> Result<JsonFiles, HarnessError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        HarnessError::io(format!("Failed to read fixture directory {}", dir.display()), e)
    })?;

    Ok(JsonFiles {
        dir: dir.to_path_buf(),
        entries,
    })
}

impl Iterator for JsonFiles {
    type Item = Result<(String, Value), HarnessError>;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(HarnessError::io(
                        format!("Failed to read fixture directory {}", self.dir.display()),
                        e,
                    )))
                }
            };

            let path = entry.path();
            if path.extension() != Some(OsStr::new(FIXTURE_EXTENSION)) || !path.is_file() {
                continue;
            }

            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            return Some(read_json(&path).map(|value| (name, value)));
        }
        None
    }
}

/// Parse a whole file as JSON
pub fn read_json(path: &Path) -> Result<Value, HarnessError> {
    let content = fs::read_to_string(path)
        .map_err(|e| HarnessError::io(format!("Failed to read fixture {}", path.display()), e))?;

    serde_json::from_str(&content).map_err(|source| HarnessError::FixtureParse {
        path: path.to_path_buf(),
        source,
    })
}

/// One fixture, typed just enough to drive a case
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureCase {
    pub name: String,
    pub pipeline: Option<Value>,
    pub url: Option<String>,
    /// Ground truth; `Some(Value::Null)` is a real expectation, `None` means skip
    pub expected: Option<Value>,
}

impl FixtureCase {
    pub fn from_value(name: &str, value: Value) -> Result<Self, HarnessError> {
        let Value::Object(mut fields) = value else {
            return Err(HarnessError::InvalidFixture {
                name: name.to_string(),
                reason: "top level is not a JSON object".to_string(),
            });
        };

        let url = match fields.remove("url") {
            None => None,
            Some(Value::String(url)) => Some(url),
            Some(other) => {
                return Err(HarnessError::InvalidFixture {
                    name: name.to_string(),
                    reason: format!("\"url\" must be a string, found {}", other),
                })
            }
        };

        Ok(Self {
            name: name.to_string(),
            pipeline: fields.remove("pipeline"),
            url,
            expected: fields.remove("expected"),
        })
    }

    /// `pipeline.assembler.options.filename`: the artifact the build produces
    pub fn assembler_filename(&self) -> Option<&str> {
        self.pipeline
            .as_ref()?
            .pointer("/assembler/options/filename")?
            .as_str()
    }
}

/// Load every case in a category directory, sorted by name.
/// A missing directory holds no cases.
pub fn load_category(dir: &Path) -> Result<Vec<FixtureCase>, HarnessError> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "fixture directory missing, no cases");
        return Ok(Vec::new());
    }

    let mut cases = json_files(dir)?
        .map(|item| item.and_then(|(name, value)| FixtureCase::from_value(&name, value)))
        .collect::<Result<Vec<_>, _>>()?;

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}
