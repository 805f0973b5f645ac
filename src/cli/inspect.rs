//! Inspect command - run image-info on one image
//!
//! image-info-harness inspect <image>

use crate::config::Config;
use crate::image_info::ImageInfo;
use crate::util::cancel::CancelToken;
use crate::util::process::SystemRunner;
use crate::util::ui;
use anyhow::{bail, Result};
use std::path::Path;

pub fn run(config: &Config, image: &Path, cancel: CancelToken) -> Result<()> {
    if !image.exists() {
        bail!("Image not found: {}", image.display());
    }

    let runner = SystemRunner::new(cancel);
    let tool = ImageInfo::new(&config.image_info, &runner);
    tool.locate()?;

    match tool.inspect(image) {
        Ok(info) => {
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Err(e) => {
            if let Some(diagnostics) = e.tool_stderr() {
                ui::diagnostic("image-info output", diagnostics);
            }
            Err(e.into())
        }
    }
}
