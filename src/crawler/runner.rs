//! Category runner
//!
//! Fetches every page of one category, folds the results into records and
//! skipped pages, and writes the category's CSV file.

use crate::config::{CategoryEntry, Config};
use crate::crawler::batch::{fetch_category, PageFetch};
use crate::extract::{Record, RecordExtractor};
use crate::output::{records_path, write_records};
use crate::state::{PageResult, SkipReason, SkippedPage};
use crate::HarvestError;
use std::path::{Path, PathBuf};

/// Everything one category produced
///
/// Each page in `1..=max_pages` appears exactly once, either in
/// `fetched_pages` or in `skipped`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub category: u32,
    pub max_pages: u32,

    /// Records of all harvested pages, in page order then document order
    pub records: Vec<Record>,

    /// Pages that were fetched and parsed (possibly yielding no records)
    pub fetched_pages: Vec<u32>,

    pub skipped: Vec<SkippedPage>,

    /// CSV file the records were written to
    pub records_path: PathBuf,
}

impl CategoryOutcome {
    /// Skipped page numbers in ascending order
    pub fn skipped_pages(&self) -> Vec<u32> {
        self.skipped.iter().map(|s| s.page).collect()
    }
}

/// Pages of one category split into harvested records and skips
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FoldedPages {
    pub records: Vec<Record>,
    pub fetched_pages: Vec<u32>,
    pub skipped: Vec<SkippedPage>,
}

/// Folds batch results in order
///
/// A failed fetch or a page whose structure does not match the extractor is
/// skipped; the rest of the category carries on.
pub fn fold_pages(
    category: u32,
    pages: Vec<PageFetch>,
    extractor: &dyn RecordExtractor,
) -> FoldedPages {
    let mut folded = FoldedPages::default();

    for PageFetch { page, result } in pages {
        match result {
            PageResult::Failure(failure) => {
                folded.skipped.push(SkippedPage {
                    page,
                    reason: SkipReason::Fetch(failure),
                });
            }
            PageResult::Success { body } => match extractor.extract(&body) {
                Ok(records) => {
                    tracing::debug!(
                        "Category {} page {}: {} records",
                        category,
                        page,
                        records.len()
                    );
                    folded.records.extend(records);
                    folded.fetched_pages.push(page);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping category {} page {}: unexpected page structure: {}",
                        category,
                        page,
                        e
                    );
                    folded.skipped.push(SkippedPage {
                        page,
                        reason: SkipReason::Extraction(e),
                    });
                }
            },
        }
    }

    folded
}

/// Runs one category end to end
///
/// # Returns
///
/// * `Ok(CategoryOutcome)` - the CSV file was written
/// * `Err(HarvestError)` - the client could not be built or the file could not be written
pub async fn run_category(
    config: &Config,
    extractor: &dyn RecordExtractor,
    category: &CategoryEntry,
    output_dir: &Path,
) -> Result<CategoryOutcome, HarvestError> {
    let pages = fetch_category(config, category).await?;
    let FoldedPages {
        records,
        fetched_pages,
        skipped,
    } = fold_pages(category.id, pages, extractor);

    let path = records_path(output_dir, category.id);
    write_records(&path, &records)?;

    tracing::info!(
        "Category {}: {} records from {} pages, {} skipped -> {}",
        category.id,
        records.len(),
        fetched_pages.len(),
        skipped.len(),
        path.display()
    );

    Ok(CategoryOutcome {
        category: category.id,
        max_pages: category.max_pages,
        records,
        fetched_pages,
        skipped,
        records_path: path,
    })
}
