use crate::config::types::{CategoryEntry, Config, ExtractConfig, FetchConfig, UserAgentConfig};
use crate::extract::SelectorExtractor;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_extract_config(&config.extract)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates request configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    validate_url_template(&config.url_template)?;

    if let Some(cap) = config.max_concurrent_requests {
        if !(1..=100).contains(&cap) {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_requests must be between 1 and 100, got {}",
                cap
            )));
        }
    }

    Ok(())
}

/// Checks that the template carries both placeholders and renders to an HTTP(S) URL
fn validate_url_template(template: &str) -> Result<(), ConfigError> {
    for placeholder in ["{category}", "{page}"] {
        if !template.contains(placeholder) {
            return Err(ConfigError::Validation(format!(
                "url_template must contain the {} placeholder, got '{}'",
                placeholder, template
            )));
        }
    }

    let sample = template.replace("{category}", "1").replace("{page}", "1");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid url_template '{}': {}", template, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "url_template '{}' must use an HTTP or HTTPS scheme",
            template
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &crate::config::types::OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Rejects selectors the default extractor cannot compile
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    SelectorExtractor::from_config(config)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(e.to_string()))
}

/// Validates the category list
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in categories {
        if entry.max_pages < 1 {
            return Err(ConfigError::Validation(format!(
                "Category {} must have max_pages >= 1, got {}",
                entry.id, entry.max_pages
            )));
        }

        if !seen.insert(entry.id) {
            return Err(ConfigError::Validation(format!(
                "Category {} is configured more than once",
                entry.id
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| {
        ConfigError::Validation(format!("Invalid email format: '{}'", email))
    })?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
