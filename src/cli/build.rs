//! Build command - run osbuild on a pipeline file
//!
//! image-info-harness build <pipeline.json> --store <dir>

use crate::config::Config;
use crate::osbuild::{Osbuild, PipelineSource};
use crate::util::cancel::CancelToken;
use crate::util::process::SystemRunner;
use crate::util::ui;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(
    config: &Config,
    pipeline: PathBuf,
    store: &Path,
    json: bool,
    cancel: CancelToken,
) -> Result<()> {
    if !pipeline.is_file() {
        bail!("Pipeline file not found: {}", pipeline.display());
    }

    fs::create_dir_all(store)
        .with_context(|| format!("Failed to create store: {}", store.display()))?;

    let runner = SystemRunner::new(cancel);
    let osbuild = Osbuild::new(&config.osbuild, &runner);

    let result = match osbuild.run(&PipelineSource::File(pipeline), store) {
        Ok(result) => result,
        Err(e) => {
            if let Some(diagnostics) = e.tool_stderr() {
                ui::diagnostic("osbuild output", diagnostics);
            }
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        ui::success("Build finished");
        ui::dim(&format!("tree_id:   {}", result.tree_id));
        ui::dim(&format!("output_id: {}", result.output_id));
        ui::dim(&format!(
            "output:    {}",
            store.join("refs").join(&result.output_id).display()
        ));
    }
    Ok(())
}
