//! Harvest orchestrator - runs every configured category in turn
//!
//! Categories are processed strictly one after another, so at most one
//! category's batch is in flight at any time. Skipped pages from all
//! categories are merged into one report that is written once at the end.

use crate::config::{validate, Config};
use crate::crawler::runner::{run_category, CategoryOutcome};
use crate::extract::{RecordExtractor, SelectorExtractor};
use crate::output::{
    ensure_output_dir, manifest_path, remove_stale_manifest, write_skip_manifest,
    CategorySummary, RunSummary,
};
use crate::state::SkipReport;
use crate::HarvestError;
use chrono::Utc;
use std::path::PathBuf;

/// Drives a complete harvest
pub struct Orchestrator {
    config: Config,
    extractor: Box<dyn RecordExtractor>,
    output_dir: PathBuf,
}

impl Orchestrator {
    /// Creates an orchestrator with an explicit extraction strategy
    ///
    /// The configuration is validated first. A config built in code never
    /// reaches the runner with a zero concurrency cap or a category listed
    /// twice.
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - configuration is valid
    /// * `Err(HarvestError::Config)` - validation failed
    pub fn new(config: Config, extractor: Box<dyn RecordExtractor>) -> Result<Self, HarvestError> {
        validate(&config)?;
        Ok(Self::assemble(config, extractor))
    }

    /// Creates an orchestrator using the selector extractor from `[extract]`
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - configuration is valid and selectors compiled
    /// * `Err(HarvestError::Config)` - validation failed, including bad selectors
    pub fn from_config(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;
        let extractor = SelectorExtractor::from_config(&config.extract)?;
        Ok(Self::assemble(config, Box::new(extractor)))
    }

    fn assemble(config: Config, extractor: Box<dyn RecordExtractor>) -> Self {
        let output_dir = PathBuf::from(&config.output.directory);
        Self {
            config,
            extractor,
            output_dir,
        }
    }

    /// Runs every category and writes the skip manifest
    ///
    /// The manifest is written only when at least one page was skipped; a
    /// manifest left by an earlier run is removed otherwise so the output
    /// directory always reflects the latest run.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let started_at = Utc::now();
        ensure_output_dir(&self.output_dir)?;

        let mut report = SkipReport::new();
        let mut categories = Vec::with_capacity(self.config.categories.len());

        for category in &self.config.categories {
            tracing::info!(
                "Harvesting category {} ({} pages)",
                category.id,
                category.max_pages
            );

            let outcome = run_category(
                &self.config,
                &*self.extractor,
                category,
                &self.output_dir,
            )
            .await?;

            report.merge(outcome.category, outcome.skipped_pages());
            categories.push(CategorySummary::from_outcome(&outcome));
        }

        let manifest_path = self.finish_manifest(&report)?;

        Ok(RunSummary {
            started_at,
            finished_at: Utc::now(),
            categories,
            manifest_path,
        })
    }

    /// Runs a single category without touching the skip manifest
    pub async fn run_one(&self, category_id: u32) -> Result<Option<CategoryOutcome>, HarvestError> {
        let Some(category) = self.config.categories.iter().find(|c| c.id == category_id) else {
            return Ok(None);
        };

        ensure_output_dir(&self.output_dir)?;
        let outcome = run_category(
            &self.config,
            &*self.extractor,
            category,
            &self.output_dir,
        )
        .await?;
        Ok(Some(outcome))
    }

    fn finish_manifest(&self, report: &SkipReport) -> Result<Option<PathBuf>, HarvestError> {
        let path = manifest_path(&self.output_dir);

        if report.is_empty() {
            if remove_stale_manifest(&path)? {
                tracing::info!("No pages skipped; removed stale {}", path.display());
            }
            return Ok(None);
        }

        write_skip_manifest(&path, report)?;
        tracing::warn!(
            "{} pages skipped across {} categories, see {}",
            report.total_pages(),
            report.iter().count(),
            path.display()
        );
        Ok(Some(path))
    }
}

/// Runs a complete harvest with the default extractor
///
/// # Example
///
/// ```no_run
/// use forti_lists::config::Config;
/// use forti_lists::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(Config::default()).await?;
/// println!("{} records", summary.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<RunSummary, HarvestError> {
    Orchestrator::from_config(config)?.run().await
}
