//! CSS-selector driven record extractor

use crate::config::ExtractConfig;
use crate::extract::{ExtractError, Record, RecordExtractor};
use scraper::{ElementRef, Html, Selector};

/// Extracts records using three CSS selectors
///
/// * `item` selects one fragment per record
/// * `title` selects, inside a fragment, the element whose text is the title
/// * `link` selects, inside a fragment, the element whose `href` is the link
#[derive(Debug)]
pub struct SelectorExtractor {
    item: Selector,
    title: Selector,
    link: Selector,
    title_source: String,
    link_source: String,
}

impl SelectorExtractor {
    /// Compiles the three selectors
    ///
    /// # Example
    ///
    /// ```
    /// use forti_lists::extract::{RecordExtractor, SelectorExtractor};
    ///
    /// let extractor = SelectorExtractor::new(".article-item", ".title", "a").unwrap();
    /// let html = r#"<div class="article-item"><a href="/x"><span class="title">X</span></a></div>"#;
    /// let records = extractor.extract(html).unwrap();
    /// assert_eq!(records[0].title, "X");
    /// assert_eq!(records[0].link, "/x");
    /// ```
    pub fn new(item: &str, title: &str, link: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            item: compile(item)?,
            title: compile(title)?,
            link: compile(link)?,
            title_source: title.to_string(),
            link_source: link.to_string(),
        })
    }

    /// Builds the extractor from the `[extract]` configuration section
    pub fn from_config(config: &ExtractConfig) -> Result<Self, ExtractError> {
        Self::new(
            &config.item_selector,
            &config.title_selector,
            &config.link_selector,
        )
    }

    fn extract_item(&self, index: usize, item: ElementRef<'_>) -> Result<Record, ExtractError> {
        let title = item
            .select(&self.title)
            .next()
            .map(normalize_text)
            .ok_or_else(|| ExtractError::MissingAnchor {
                index,
                selector: self.title_source.clone(),
            })?;

        let link_element = item
            .select(&self.link)
            .next()
            .ok_or_else(|| ExtractError::MissingAnchor {
                index,
                selector: self.link_source.clone(),
            })?;

        let link = link_element
            .value()
            .attr("href")
            .map(|href| href.trim().to_string())
            .ok_or_else(|| ExtractError::MissingAttribute {
                index,
                attribute: "href".to_string(),
            })?;

        Ok(Record { title, link })
    }
}

impl RecordExtractor for SelectorExtractor {
    fn extract(&self, html: &str) -> Result<Vec<Record>, ExtractError> {
        let document = Html::parse_document(html);

        document
            .select(&self.item)
            .enumerate()
            .map(|(index, item)| self.extract_item(index, item))
            .collect()
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Joins the element's text nodes, collapsing runs of whitespace
fn normalize_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
