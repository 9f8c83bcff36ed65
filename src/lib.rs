//! Tender-Harvest: a concurrent scraper for the Azerbaijan e-tender portal
//!
//! This crate fetches the paginated tender listing from the etender.gov.az
//! events API under a bounded concurrency cap, aggregates the results in
//! memory, and exports them to CSV and XLSX for downstream analysis.

pub mod config;
pub mod export;
pub mod scraper;
pub mod state;

use thiserror::Error;

/// Main error type for tender-harvest operations
#[derive(Debug, Error)]
pub enum TenderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid value for header '{0}'")]
    InvalidHeader(&'static str),

    #[error("Could not determine total pages; nothing to scrape")]
    EmptyPagination,

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for tender-harvest operations
pub type Result<T> = std::result::Result<T, TenderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use scraper::{Controller, FailureReason, PageResult, ScrapeOutcome};
pub use state::{Item, RunState};
