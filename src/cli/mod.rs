use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::harness::Category;

#[derive(Parser)]
#[command(name = "image-info-harness")]
#[command(about = "Check image-info output against recorded JSON fixtures")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ./image-info-harness.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log tool invocations and store handling to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run fixture cases and report pass/fail/skip per case
    Run {
        /// Fixture root containing pipelines/ and images/
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Which fixture category to run
        #[arg(long, value_enum, default_value = "all")]
        category: CategoryArg,

        /// Only run cases whose name contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Scratch directory for the build store and downloads
        #[arg(long)]
        scratch: Option<PathBuf>,

        /// Keep the build store after the run
        #[arg(long)]
        keep_store: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List fixture cases without running them
    List {
        /// Fixture root containing pipelines/ and images/
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a pipeline file with osbuild into an existing store
    Build {
        /// Pipeline JSON file
        pipeline: PathBuf,

        /// osbuild store directory (created if missing, never removed)
        #[arg(long)]
        store: PathBuf,

        /// Print the build result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run image-info on one image and print its JSON
    Inspect {
        /// Image file to inspect
        image: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    All,
    Pipelines,
    Images,
}

impl CategoryArg {
    pub fn categories(self) -> Vec<Category> {
        match self {
            CategoryArg::All => Category::ALL.to_vec(),
            CategoryArg::Pipelines => vec![Category::Pipelines],
            CategoryArg::Images => vec![Category::Images],
        }
    }
}

pub mod build;
pub mod inspect;
pub mod list;
pub mod run;
