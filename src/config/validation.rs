use crate::config::types::{ApiConfig, Config, FilterConfig, OutputConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_filter_config(&config.filters)?;
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the API endpoint and header configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let base_url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base_url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use HTTPS scheme, got '{}'",
            config.base_url
        )));
    }

    Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin: {}", e)))?;
    Url::parse(&config.referer)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer: {}", e)))?;

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.origin_token.is_empty() {
        return Err(ConfigError::Validation(
            "origin-token cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the filter query parameters
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    let page_size: u32 = config.page_size.parse().map_err(|_| {
        ConfigError::Validation(format!(
            "page-size must be an integer, got '{}'",
            config.page_size
        ))
    })?;

    if !(1..=100).contains(&page_size) {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 100, got {}",
            page_size
        )));
    }

    // Code filters are numeric when present; empty means unfiltered
    for (name, value) in [
        ("event-type", &config.event_type),
        ("event-status", &config.event_status),
    ] {
        if !value.is_empty() && value.parse::<u32>().is_err() {
            return Err(ConfigError::Validation(format!(
                "{} must be a numeric code, got '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates scraper pacing and concurrency settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.concurrent_requests < 1 || config.concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrent-requests must be between 1 and 100, got {}",
            config.concurrent_requests
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch-size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.pool_max_idle_per_host < 1 {
        return Err(ConfigError::Validation(format!(
            "pool-max-idle-per-host must be >= 1, got {}",
            config.pool_max_idle_per_host
        )));
    }

    Ok(())
}

/// Validates output paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_stem.is_empty() {
        return Err(ConfigError::Validation(
            "file-stem cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.scraper.concurrent_requests = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_plain_http_endpoint() {
        let mut config = Config::default();
        config.api.base_url = "http://etender.gov.az/api/events".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_unparsable_page_size() {
        let mut config = Config::default();
        config.filters.page_size = "fifteen".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_page_size() {
        let mut config = Config::default();
        config.filters.page_size = "500".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_event_type() {
        let mut config = Config::default();
        config.filters.event_type = "open".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_allows_empty_code_filters() {
        let mut config = Config::default();
        config.filters.event_type = String::new();
        config.filters.event_status = String::new();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_missing_token() {
        let mut config = Config::default();
        config.api.origin_token = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_file_stem() {
        let mut config = Config::default();
        config.output.file_stem = String::new();
        assert!(validate(&config).is_err());
    }
}
