//! Record extraction from listing pages
//!
//! A [`RecordExtractor`] turns the HTML of one listing page into an ordered
//! list of [`Record`]s. The default [`SelectorExtractor`] is driven by CSS
//! selectors from configuration, so a change in the site layout only needs a
//! new set of selectors or a different extractor implementation.

mod selector;

pub use selector::SelectorExtractor;

use thiserror::Error;

/// One catalog entry extracted from a listing fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub link: String,
}

/// Errors that can occur while extracting records from a page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Listing item {index} has no element matching '{selector}'")]
    MissingAnchor { index: usize, selector: String },

    #[error("Listing item {index} link has no '{attribute}' attribute")]
    MissingAttribute { index: usize, attribute: String },
}

/// Strategy for turning page content into records
pub trait RecordExtractor {
    /// Extracts every record on the page, in document order
    ///
    /// An empty vector means the page was valid but listed nothing; an error
    /// means the page did not have the expected structure.
    fn extract(&self, html: &str) -> Result<Vec<Record>, ExtractError>;
}
