//! Crawler module for listing page fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with per-page failure isolation
//! - Concurrent batch fetching of one category
//! - Folding pages into records and skips per category
//! - Sequential orchestration across categories

mod batch;
mod fetcher;
mod orchestrator;
mod runner;

pub use batch::{fetch_category, PageFetch};
pub use fetcher::{build_http_client, fetch_page, page_url, user_agent_string};
pub use orchestrator::{run_harvest, Orchestrator};
pub use runner::{fold_pages, run_category, CategoryOutcome, FoldedPages};
