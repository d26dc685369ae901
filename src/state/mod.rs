//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `PageResult`: outcome of one page fetch (content or a failure reason)
//! - `SkippedPage` / `SkipReason`: a page that produced no records, and why
//! - `SkipReport`: skipped page numbers grouped by category, written as the skip manifest

mod page_result;
mod skip_report;

// Re-export main types
pub use page_result::{FetchFailure, PageResult, SkipReason, SkippedPage, TransportKind};
pub use skip_report::SkipReport;
