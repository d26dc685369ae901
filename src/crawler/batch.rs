//! Concurrent fetch of every page in one category
//!
//! All pages of a category are requested at once through one pooled client
//! that lives exactly as long as the batch. The futures are polled together
//! on the calling task and joined, so the returned vector is in page order no
//! matter which request finished first.

use crate::config::{CategoryEntry, Config};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::state::PageResult;
use crate::HarvestError;
use futures::future::join_all;
use tokio::sync::Semaphore;

/// Result of fetching one page of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub page: u32,
    pub result: PageResult,
}

/// Fetches pages `1..=category.max_pages` concurrently
///
/// Waits for every request to finish; a failed page never cancels the
/// others. When `fetch.max-concurrent-requests` is set, at most that many
/// requests are in flight at a time (a cap of 0 is treated as 1).
///
/// # Returns
///
/// * `Ok(Vec<PageFetch>)` - one entry per page, in ascending page order
/// * `Err(HarvestError)` - the HTTP client could not be built
pub async fn fetch_category(
    config: &Config,
    category: &CategoryEntry,
) -> Result<Vec<PageFetch>, HarvestError> {
    let client = build_http_client(&config.user_agent, &config.fetch)?;
    let limiter = config
        .fetch
        .max_concurrent_requests
        // A zero permit semaphore would never grant a request
        .map(|cap| Semaphore::new(cap.max(1) as usize));
    let template = config.fetch.url_template.as_str();

    tracing::debug!(
        "Launching {} requests for category {}",
        category.max_pages,
        category.id
    );

    let requests = (1..=category.max_pages).map(|page| {
        let client = &client;
        let limiter = limiter.as_ref();
        async move {
            // The semaphore is never closed, so acquire only fails if it is dropped
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire().await.ok(),
                None => None,
            };
            let result = fetch_page(client, template, category.id, page).await;
            PageFetch { page, result }
        }
    });

    Ok(join_all(requests).await)
}
