mod cli;
mod compare;
mod config;
mod download;
mod error;
mod fixture;
mod harness;
mod image_info;
mod osbuild;
mod paths;
mod report;
mod store;
mod util;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use harness::SuitePlan;
use util::cancel::CancelToken;

fn main() {
    if let Err(e) = run() {
        util::ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;

    let cancel = CancelToken::new();
    cancel.install_ctrlc_handler();

    match cli.command {
        Some(Commands::Run {
            fixtures,
            category,
            filter,
            scratch,
            keep_store,
            json,
        }) => {
            if let Some(fixtures) = fixtures {
                config.paths.fixtures = fixtures;
            }
            if let Some(scratch) = scratch {
                config.paths.scratch = scratch;
            }
            config.keep_store |= keep_store;

            let options = cli::run::RunOptions {
                plan: SuitePlan {
                    categories: category.categories(),
                    filter,
                },
                json,
            };
            cli::run::run(&config, options, cancel)
        }
        Some(Commands::List { fixtures, json }) => {
            if let Some(fixtures) = fixtures {
                config.paths.fixtures = fixtures;
            }
            cli::list::run(&config, json)
        }
        Some(Commands::Build {
            pipeline,
            store,
            json,
        }) => cli::build::run(&config, pipeline, &store, json, cancel),
        Some(Commands::Inspect { image }) => cli::inspect::run(&config, &image, cancel),
        None => {
            // No command provided, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "image_info_harness=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
