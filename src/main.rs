//! Tender-Harvest command-line entry point

use clap::Parser;
use std::path::{Path, PathBuf};
use tender_harvest::config::{load_config_with_hash, Config};
use tracing_subscriber::EnvFilter;

/// Tender-Harvest: a concurrent scraper for the etender.gov.az portal
///
/// Fetches every page of the current tender listing under a bounded
/// concurrency cap and exports the results to CSV and XLSX.
#[derive(Parser, Debug)]
#[command(name = "tender-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes the Azerbaijan e-tender portal", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long, conflicts_with = "report")]
    dry_run: bool,

    /// Print a summary for a previously exported CSV file and exit
    #[arg(long, value_name = "CSV")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // The report mode only touches the named CSV, never the network
    if let Some(csv_path) = cli.report.as_deref() {
        return handle_report(csv_path);
    }

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tender_harvest=info,warn"),
            1 => EnvFilter::new("tender_harvest=debug,info"),
            2 => EnvFilter::new("tender_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config) {
    println!("=== Tender-Harvest Dry Run ===\n");

    println!("API:");
    println!("  Endpoint: {}", config.api.base_url);
    println!("  Origin: {}", config.api.origin);

    println!("\nFilters:");
    for (key, value) in config.filters.query_pairs() {
        let shown = if value.is_empty() {
            "(unset)".to_string()
        } else {
            value
        };
        println!("  {}: {}", key, shown);
    }

    println!("\nScraper:");
    println!(
        "  Concurrent requests: {}",
        config.scraper.concurrent_requests
    );
    println!("  Batch size: {}", config.scraper.batch_size);
    println!("  Batch pause: {}ms", config.scraper.batch_pause_ms);
    println!("  Request delay: {}ms", config.scraper.request_delay_ms);
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  File stem: {}", config.output.file_stem);

    println!("\n✓ Configuration is valid");
}

/// Handles the --report mode: summarizes a previously exported CSV
fn handle_report(path: &Path) -> anyhow::Result<()> {
    let report = tender_harvest::export::load_report(path)?;
    tender_harvest::export::print_report(&report);
    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    match tender_harvest::scraper::run(config).await {
        Ok(outcome) => {
            if !outcome.failed_pages.is_empty() {
                tracing::warn!(
                    "{} pages failed and were skipped: {:?}",
                    outcome.failed_pages.len(),
                    outcome.failed_pages
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
