//! List command - show fixture cases and whether they would run
//!
//! image-info-harness list [--json]

use crate::config::Config;
use crate::fixture::FixtureCase;
use crate::harness::{self, Category, SuitePlan};
use crate::util::ui;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListedCase {
    pub category: Category,
    pub name: String,
    pub runnable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ListedCase {
    fn new(category: Category, case: &FixtureCase) -> Self {
        let note = if case.expected.is_none() {
            Some("skipped: no expected value".to_string())
        } else {
            match category {
                Category::Pipelines if case.pipeline.is_none() => {
                    Some("invalid: missing pipeline".to_string())
                }
                Category::Pipelines if case.assembler_filename().is_none() => {
                    Some("invalid: no assembler filename".to_string())
                }
                Category::Images if case.url.is_none() => Some("invalid: missing url".to_string()),
                _ => None,
            }
        };

        Self {
            category,
            name: case.name.clone(),
            runnable: note.is_none(),
            note,
        }
    }
}

pub fn collect(config: &Config) -> Result<Vec<ListedCase>> {
    let loaded = harness::load_plan(&SuitePlan::all(), &config.paths.fixtures).with_context(|| {
        format!(
            "Failed to load fixtures from {}",
            config.paths.fixtures.display()
        )
    })?;

    Ok(loaded
        .iter()
        .flat_map(|(category, cases)| cases.iter().map(|case| ListedCase::new(*category, case)))
        .collect())
}

pub fn run(config: &Config, json: bool) -> Result<()> {
    let listed = collect(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        ui::warn(&format!(
            "No fixtures under {}",
            config.paths.fixtures.display()
        ));
        return Ok(());
    }

    for case in &listed {
        let label = format!("{}/{}", case.category, case.name);
        match &case.note {
            None => ui::success(&label),
            Some(note) => ui::skip(&format!("{} ({})", label, note)),
        }
    }
    Ok(())
}
