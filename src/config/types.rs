use serde::Deserialize;

/// Default listing URL; `{category}` and `{page}` are substituted per request
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.fortiguard.com/encyclopedia?type=ips&risk={category}&page={page}";

/// Main configuration structure for forti-lists
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults documented on each field.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(rename = "category", default = "default_categories")]
    pub categories: Vec<CategoryEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            extract: ExtractConfig::default(),
            categories: default_categories(),
        }
    }
}

/// Request behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Target URL template containing `{category}` and `{page}` placeholders
    #[serde(rename = "url-template", default = "default_url_template")]
    pub url_template: String,

    /// Cap on simultaneous in-flight requests within one category batch.
    /// `None` fans out every page of the category at once.
    #[serde(rename = "max-concurrent-requests", default)]
    pub max_concurrent_requests: Option<u32>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            max_concurrent_requests: None,
            request_timeout: default_request_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "forti-lists".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/forti-lists/forti-lists".to_string(),
            contact_email: "forti-lists@users.noreply.github.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-category CSV files and the skip manifest
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// CSS selectors used by the default record extractor
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Selects one listing fragment per record
    #[serde(rename = "item-selector", default = "default_item_selector")]
    pub item_selector: String,

    /// Selects the title element inside a fragment
    #[serde(rename = "title-selector", default = "default_title_selector")]
    pub title_selector: String,

    /// Selects the element whose `href` is the record link
    #[serde(rename = "link-selector", default = "default_link_selector")]
    pub link_selector: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            item_selector: default_item_selector(),
            title_selector: default_title_selector(),
            link_selector: default_link_selector(),
        }
    }
}

/// A catalog category and the number of pages fetched for it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryEntry {
    pub id: u32,

    /// Highest page number requested (pages are 1..=max_pages)
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_output_directory() -> String {
    "datasets".to_string()
}

fn default_item_selector() -> String {
    ".article-item".to_string()
}

fn default_title_selector() -> String {
    ".title".to_string()
}

fn default_link_selector() -> String {
    "a".to_string()
}

/// Risk levels 1 through 5, five pages each
pub fn default_categories() -> Vec<CategoryEntry> {
    (1..=5)
        .map(|id| CategoryEntry { id, max_pages: 5 })
        .collect()
}
