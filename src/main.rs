//! forti-lists main entry point
//!
//! This is the command-line interface for the forti-lists harvester.

use anyhow::Context;
use clap::Parser;
use forti_lists::config::{load_config_with_hash, Config};
use forti_lists::crawler::{page_url, Orchestrator};
use forti_lists::output::{manifest_path, print_summary, records_path};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// forti-lists: concurrent catalog listing harvester
///
/// Fetches every listing page of each configured category concurrently,
/// writes the extracted records to one CSV file per category and lists any
/// skipped pages in a JSON manifest.
#[derive(Parser, Debug)]
#[command(name = "forti-lists")]
#[command(version)]
#[command(about = "Concurrent catalog listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Harvest only this category; the skip manifest is left untouched
    #[arg(long, value_name = "ID")]
    category: Option<u32>,

    /// Validate config and show what would be requested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if let Some(category) = cli.category {
        handle_single_category(config, category).await?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forti_lists=info,warn"),
            1 => EnvFilter::new("forti_lists=debug,info"),
            2 => EnvFilter::new("forti_lists=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows every request and output file
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let output_dir = Path::new(&config.output.directory);

    println!("=== forti-lists Dry Run ===\n");

    println!("Fetch Configuration:");
    println!("  URL template: {}", config.fetch.url_template);
    match config.fetch.max_concurrent_requests {
        Some(cap) => println!("  Max concurrent requests: {}", cap),
        None => println!("  Max concurrent requests: unbounded"),
    }
    if config.fetch.request_timeout > 0 {
        println!("  Request timeout: {}s", config.fetch.request_timeout);
    } else {
        println!("  Request timeout: none");
    }

    println!("\nExtraction:");
    println!("  Item: {}", config.extract.item_selector);
    println!("  Title: {}", config.extract.title_selector);
    println!("  Link: {}", config.extract.link_selector);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        println!(
            "  - {} ({} pages) -> {}",
            category.id,
            category.max_pages,
            records_path(output_dir, category.id).display()
        );
        for page in 1..=category.max_pages {
            let url = page_url(&config.fetch.url_template, category.id, page)?;
            println!("    * {}", url);
        }
    }

    println!(
        "\nSkip manifest (only if pages fail): {}",
        manifest_path(output_dir).display()
    );

    let total: u32 = config.categories.iter().map(|c| c.max_pages).sum();
    println!("\n✓ Configuration is valid");
    println!("✓ Would request {} pages", total);

    Ok(())
}

/// Handles --category: harvests one category and reports its skips
async fn handle_single_category(config: Config, category: u32) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;

    let outcome = orchestrator
        .run_one(category)
        .await?
        .with_context(|| format!("category {} is not configured", category))?;

    println!(
        "Category {}: {} records -> {}",
        outcome.category,
        outcome.records.len(),
        outcome.records_path.display()
    );
    if !outcome.skipped.is_empty() {
        println!("Skipped pages:");
        for skipped in &outcome.skipped {
            println!("  - page {}: {}", skipped.page, skipped.reason);
        }
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting {} categories into {}",
        config.categories.len(),
        config.output.directory
    );

    let orchestrator = Orchestrator::from_config(config)?;
    match orchestrator.run().await {
        Ok(summary) => {
            tracing::info!("Harvest completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
