//! Run summary generation
//!
//! This module condenses the per-category outcomes of a harvest into counts
//! and renders them for the terminal.

use crate::crawler::CategoryOutcome;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Counts for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: u32,

    /// Pages requested (the category's page bound)
    pub pages_requested: u32,

    /// Pages that were fetched and parsed
    pub pages_harvested: usize,

    pub records: usize,

    /// Skipped page counts keyed by reason label
    pub skipped_by_reason: BTreeMap<&'static str, usize>,

    pub records_path: PathBuf,
}

impl CategorySummary {
    pub fn from_outcome(outcome: &CategoryOutcome) -> Self {
        let mut skipped_by_reason = BTreeMap::new();
        for skipped in &outcome.skipped {
            *skipped_by_reason.entry(skipped.reason.label()).or_insert(0) += 1;
        }

        Self {
            category: outcome.category,
            pages_requested: outcome.max_pages,
            pages_harvested: outcome.fetched_pages.len(),
            records: outcome.records.len(),
            skipped_by_reason,
            records_path: outcome.records_path.clone(),
        }
    }

    pub fn pages_skipped(&self) -> usize {
        self.skipped_by_reason.values().sum()
    }
}

/// Summary of a complete harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategorySummary>,

    /// Set when at least one page was skipped
    pub manifest_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn total_records(&self) -> usize {
        self.categories.iter().map(|c| c.records).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.categories.iter().map(CategorySummary::pages_skipped).sum()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!();

    println!("Categories ({}):", summary.categories.len());
    for category in &summary.categories {
        println!(
            "  - {}: {} records from {}/{} pages -> {}",
            category.category,
            category.records,
            category.pages_harvested,
            category.pages_requested,
            category.records_path.display()
        );
        for (reason, count) in &category.skipped_by_reason {
            println!("    * skipped ({}): {}", reason, count);
        }
    }
    println!();

    println!("Total records: {}", summary.total_records());
    match &summary.manifest_path {
        Some(path) => println!(
            "Skipped pages: {} (see {})",
            summary.total_skipped(),
            path.display()
        ),
        None => println!("Skipped pages: 0"),
    }
}
