//! Run command - the suite driver
//!
//! image-info-harness run [--category all|pipelines|images] [--filter TEXT]
//!
//! 1. Check the inspection tool exists
//! 2. Load every selected fixture (a broken one aborts the run)
//! 3. Acquire one build store for the whole run
//! 4. Run cases in order, printing each outcome
//! 5. Release (or keep) the store and print the summary

use crate::config::Config;
use crate::download::HttpFetcher;
use crate::harness::{self, Harness, SuitePlan};
use crate::image_info::ImageInfo;
use crate::report;
use crate::store::BuildStore;
use crate::util::cancel::CancelToken;
use crate::util::process::SystemRunner;
use crate::util::ui;
use anyhow::{bail, Context, Result};
use std::time::Duration;

pub struct RunOptions {
    pub plan: SuitePlan,
    pub json: bool,
}

pub fn run(config: &Config, options: RunOptions, cancel: CancelToken) -> Result<()> {
    let runner = SystemRunner::new(cancel.clone());

    let tool = ImageInfo::new(&config.image_info, &runner)
        .locate()
        .context("Cannot run cases without image-info")?;
    tracing::debug!(tool = %tool.display(), "found image-info");

    let loaded = harness::load_plan(&options.plan, &config.paths.fixtures).with_context(|| {
        format!(
            "Failed to load fixtures from {}",
            config.paths.fixtures.display()
        )
    })?;

    let total: usize = loaded.iter().map(|(_, cases)| cases.len()).sum();
    if total == 0 {
        bail!(
            "No fixture cases found under {}",
            config.paths.fixtures.display()
        );
    }

    let store = BuildStore::acquire(&config.paths.scratch)?;
    let fetcher = HttpFetcher::new(
        &config.paths.scratch,
        Duration::from_secs(config.download.timeout_secs),
    );
    let harness = Harness::new(config, &runner, &fetcher, cancel);

    if !options.json {
        ui::info(&format!("Running {} case(s)...", total));
    }

    let mut suite = harness.run_suite(&loaded, store.path(), |case| {
        if !options.json {
            report::print_case(case);
        }
    });

    if config.keep_store {
        suite.kept_store = Some(store.keep());
    } else {
        store.release()?;
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&suite)?);
    } else {
        report::print_summary(&suite);
    }

    if suite.cancelled {
        bail!("Interrupted");
    }
    let failed = suite.summary().failed;
    if failed > 0 {
        bail!("{} case(s) failed", failed);
    }
    Ok(())
}
