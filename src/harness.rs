//! Case execution and the suite driver
//!
//! Each case is a straight line: build or fetch, inspect, compare. Nothing
//! is retried, and a failing case never stops the ones after it.

use crate::compare;
use crate::config::Config;
use crate::download::Fetcher;
use crate::error::HarnessError;
use crate::fixture::{self, FixtureCase};
use crate::image_info::ImageInfo;
use crate::osbuild::{Osbuild, PipelineSource};
use crate::paths;
use crate::report::{CaseFailure, CaseReport, FailureKind, Outcome, SuiteReport};
use crate::util::cancel::CancelToken;
use crate::util::process::CommandRunner;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

const NO_EXPECTED: &str = "no \"expected\" value recorded";

/// Fixture category, one directory each under the fixture root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Built with osbuild from an embedded pipeline, then inspected
    Pipelines,
    /// Downloaded from a URL, then inspected
    Images,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Pipelines, Category::Images];

    pub fn dir(self, fixtures: &Path) -> PathBuf {
        match self {
            Category::Pipelines => paths::pipelines_dir(fixtures),
            Category::Images => paths::images_dir(fixtures),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Pipelines => write!(f, "pipelines"),
            Category::Images => write!(f, "images"),
        }
    }
}

/// Which cases a run covers
#[derive(Debug, Clone)]
pub struct SuitePlan {
    pub categories: Vec<Category>,
    /// Substring match on case names
    pub filter: Option<String>,
}

impl SuitePlan {
    pub fn all() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
            filter: None,
        }
    }

    fn selects(&self, case: &FixtureCase) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |needle| case.name.contains(needle))
    }
}

/// Load the selected fixtures for every category in the plan.
/// A broken fixture aborts here, before any case runs.
pub fn load_plan(
    plan: &SuitePlan,
    fixtures: &Path,
) -> Result<Vec<(Category, Vec<FixtureCase>)>, HarnessError> {
    plan.categories
        .iter()
        .map(|&category| {
            let cases = fixture::load_category(&category.dir(fixtures))?
                .into_iter()
                .filter(|case| plan.selects(case))
                .collect();
            Ok((category, cases))
        })
        .collect()
}

pub struct Harness<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    fetcher: &'a dyn Fetcher,
    cancel: CancelToken,
}

impl<'a> Harness<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn Fetcher,
        cancel: CancelToken,
    ) -> Self {
        Self {
            config,
            runner,
            fetcher,
            cancel,
        }
    }

    fn image_info(&self) -> ImageInfo<'_> {
        ImageInfo::new(&self.config.image_info, self.runner)
    }

    /// Build the case's pipeline into `store`, inspect the artifact, compare
    pub fn run_pipeline_case(&self, case: &FixtureCase, store: &Path) -> Outcome {
        self.pipeline_case(case, store)
            .unwrap_or_else(|e| Outcome::Failed(CaseFailure::from(e)))
    }

    fn pipeline_case(&self, case: &FixtureCase, store: &Path) -> Result<Outcome, HarnessError> {
        let Some(expected) = &case.expected else {
            return Ok(Outcome::skipped(NO_EXPECTED));
        };
        let Some(pipeline) = &case.pipeline else {
            return Ok(Outcome::invalid("missing \"pipeline\""));
        };
        let Some(filename) = case.assembler_filename() else {
            return Ok(Outcome::invalid(
                "pipeline has no assembler.options.filename",
            ));
        };

        let build = Osbuild::new(&self.config.osbuild, self.runner)
            .run(&PipelineSource::Inline(pipeline.clone()), store)?;

        let image = build.artifact_path(store, filename);
        let actual = self.image_info().inspect(&image)?;
        Ok(compare_outcome(expected, &actual))
    }

    /// Download the case's image, inspect it, compare.
    /// The downloaded file is gone when this returns, whatever the outcome.
    pub fn run_url_case(&self, case: &FixtureCase) -> Outcome {
        self.url_case(case)
            .unwrap_or_else(|e| Outcome::Failed(CaseFailure::from(e)))
    }

    fn url_case(&self, case: &FixtureCase) -> Result<Outcome, HarnessError> {
        let Some(expected) = &case.expected else {
            return Ok(Outcome::skipped(NO_EXPECTED));
        };
        let Some(url) = &case.url else {
            return Ok(Outcome::invalid("missing \"url\""));
        };

        // Deleted on drop, including the early returns below
        let image = self.fetcher.fetch(url)?;
        let actual = self.image_info().inspect(&image)?;
        Ok(compare_outcome(expected, &actual))
    }

    pub fn run_case(&self, category: Category, case: &FixtureCase, store: &Path) -> Outcome {
        let _span = tracing::info_span!("case", %category, name = %case.name).entered();
        match category {
            Category::Pipelines => self.run_pipeline_case(case, store),
            Category::Images => self.run_url_case(case),
        }
    }

    /// Run every loaded case in order, reporting each as it finishes.
    /// Stops early, without failing, once the cancel token trips.
    pub fn run_suite(
        &self,
        loaded: &[(Category, Vec<FixtureCase>)],
        store: &Path,
        mut on_case: impl FnMut(&CaseReport),
    ) -> SuiteReport {
        let mut report = SuiteReport::default();

        'categories: for (category, cases) in loaded {
            for case in cases {
                if self.cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'categories;
                }

                let outcome = self.run_case(*category, case, store);
                let case_report = CaseReport {
                    category: *category,
                    name: case.name.clone(),
                    outcome,
                };
                on_case(&case_report);
                report.cases.push(case_report);
            }
        }

        if self.cancel.is_cancelled() {
            report.cancelled = true;
        }
        report
    }
}

fn compare_outcome(expected: &Value, actual: &Value) -> Outcome {
    if compare::json_eq(expected, actual) {
        Outcome::Passed
    } else {
        Outcome::Failed(CaseFailure {
            kind: FailureKind::Mismatch,
            message: "image-info output differs from expected".to_string(),
            details: Some(compare::render_mismatch(expected, actual)),
        })
    }
}
