//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - Rendering the listing URL for a category page
//! - GET requests to fetch page content
//! - Error classification
//!
//! A fetch never returns an error to its caller: every failure becomes a
//! [`PageResult::Failure`] carrying the reason.

use crate::config::{FetchConfig, UserAgentConfig};
use crate::state::{FetchFailure, PageResult, TransportKind};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Formats the user agent as `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed; a 3xx answer is reported like any other
/// non-success status.
///
/// # Example
///
/// ```
/// use forti_lists::config::{FetchConfig, UserAgentConfig};
/// use forti_lists::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent_string(user_agent))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true);

    if fetch.request_timeout > 0 {
        let timeout = Duration::from_secs(fetch.request_timeout);
        builder = builder
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)));
    }

    builder.build()
}

/// Renders the URL of one listing page from the template
///
/// # Example
///
/// ```
/// use forti_lists::crawler::page_url;
///
/// let url = page_url("https://example.com/list?risk={category}&page={page}", 3, 2).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/list?risk=3&page=2");
/// ```
pub fn page_url(template: &str, category: u32, page: u32) -> Result<Url, url::ParseError> {
    let rendered = template
        .replace("{category}", &category.to_string())
        .replace("{page}", &page.to_string());
    Url::parse(&rendered)
}

/// Fetches one listing page
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx, body read | `Success` |
/// | non-2xx status | `Failure(Status)` |
/// | timeout | `Failure(Transport { Timeout })` |
/// | connection refused, DNS, TLS | `Failure(Transport { Connect })` |
/// | body read error | `Failure(Body)` |
/// | template renders an invalid URL | `Failure(InvalidUrl)` |
///
/// Failures are logged with the category and page number.
pub async fn fetch_page(client: &Client, template: &str, category: u32, page: u32) -> PageResult {
    let url = match page_url(template, category, page) {
        Ok(url) => url,
        Err(e) => {
            return fail(
                category,
                page,
                FetchFailure::InvalidUrl {
                    error: e.to_string(),
                },
            )
        }
    };

    tracing::debug!("Fetching category {} page {}: {}", category, page, url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return fail(category, page, classify_transport_error(&e)),
    };

    let status = response.status();
    if !status.is_success() {
        return fail(
            category,
            page,
            FetchFailure::Status {
                status_code: status.as_u16(),
            },
        );
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!(
                "Fetched category {} page {} ({} bytes)",
                category,
                page,
                body.len()
            );
            PageResult::Success { body }
        }
        Err(e) => fail(
            category,
            page,
            FetchFailure::Body {
                error: e.to_string(),
            },
        ),
    }
}

fn fail(category: u32, page: u32, failure: FetchFailure) -> PageResult {
    tracing::warn!(
        "Request failed for category {} page {}: {}",
        category,
        page,
        failure
    );
    PageResult::Failure(failure)
}

fn classify_transport_error(e: &reqwest::Error) -> FetchFailure {
    let kind = if e.is_timeout() {
        TransportKind::Timeout
    } else if e.is_connect() {
        TransportKind::Connect
    } else {
        TransportKind::Other
    };

    FetchFailure::Transport {
        kind,
        error: e.to_string(),
    }
}
