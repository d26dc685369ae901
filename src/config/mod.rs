//! Configuration module for forti-lists
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section has documented defaults, so running without a file is
//! equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use forti_lists::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("forti-lists.toml")).unwrap();
//! println!("Writing to: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_categories, CategoryEntry, Config, ExtractConfig, FetchConfig, OutputConfig,
    UserAgentConfig, DEFAULT_URL_TEMPLATE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
