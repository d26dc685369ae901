//! Per-page fetch outcomes and skip reasons
//!
//! A page fetch produces exactly one [`PageResult`]. Failures keep their
//! reason so the category runner can log it and the run summary can count it.

use crate::extract::ExtractError;
use std::fmt;

/// Outcome of fetching one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    /// The server answered 2xx and the body was read
    Success { body: String },

    /// The page could not be retrieved
    Failure(FetchFailure),
}

impl PageResult {
    /// Returns true if the fetch produced content
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Transport-level failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// The request exceeded the client timeout
    Timeout,

    /// Connection refused, DNS failure, TLS error
    Connect,

    /// Anything else reported by the HTTP client
    Other,
}

/// Why a page fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// No response was received
    Transport { kind: TransportKind, error: String },

    /// The server answered with a non-2xx status
    Status { status_code: u16 },

    /// The response body could not be read
    Body { error: String },

    /// The URL template rendered to an invalid URL
    InvalidUrl { error: String },
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { kind, error } => match kind {
                TransportKind::Timeout => write!(f, "request timeout: {}", error),
                TransportKind::Connect => write!(f, "connection error: {}", error),
                TransportKind::Other => write!(f, "request error: {}", error),
            },
            Self::Status { status_code } => write!(f, "HTTP {}", status_code),
            Self::Body { error } => write!(f, "body read error: {}", error),
            Self::InvalidUrl { error } => write!(f, "invalid URL: {}", error),
        }
    }
}

/// Why a page ended up in the skip list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The page could not be fetched
    Fetch(FetchFailure),

    /// The page was fetched but did not have the expected structure
    Extraction(ExtractError),
}

impl SkipReason {
    /// Short label used when grouping skips in the run summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fetch(FetchFailure::Transport { .. }) => "transport",
            Self::Fetch(FetchFailure::Status { .. }) => "status",
            Self::Fetch(FetchFailure::Body { .. }) => "body",
            Self::Fetch(FetchFailure::InvalidUrl { .. }) => "invalid-url",
            Self::Extraction(_) => "extraction",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(failure) => write!(f, "{}", failure),
            Self::Extraction(error) => write!(f, "extraction failed: {}", error),
        }
    }
}

/// A page that produced no records, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPage {
    pub page: u32,
    pub reason: SkipReason,
}
