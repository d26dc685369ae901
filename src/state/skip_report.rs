//! Skipped pages accumulated across a run
//!
//! The report serializes straight into the `skipped.json` manifest: category
//! ids become string keys and each value is the ordered page list.

use serde::Serialize;
use std::collections::BTreeMap;

/// Pages skipped during a run, grouped by category
///
/// Categories iterate in ascending id order and each page list keeps the
/// order pages were recorded in, so serializing the same run twice yields the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipReport {
    categories: BTreeMap<u32, Vec<u32>>,
}

impl SkipReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the skipped pages of one category
    ///
    /// Empty lists are ignored so a category without failures never appears
    /// in the manifest.
    pub fn merge(&mut self, category: u32, pages: Vec<u32>) {
        if pages.is_empty() {
            return;
        }
        self.categories.entry(category).or_default().extend(pages);
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of skipped pages across all categories
    pub fn total_pages(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> {
        self.categories
            .iter()
            .map(|(category, pages)| (*category, pages.as_slice()))
    }
}
