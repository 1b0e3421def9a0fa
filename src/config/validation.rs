use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler budgets and timeouts
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_total_bytes < 1 {
        return Err(ConfigError::Validation(format!(
            "max_total_bytes must be >= 1, got {}",
            config.max_total_bytes
        )));
    }

    if config.max_file_bytes < 1 {
        return Err(ConfigError::Validation(format!(
            "max_file_bytes must be >= 1, got {}",
            config.max_file_bytes
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
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

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.work_dir.is_empty() {
        return Err(ConfigError::Validation("work_dir cannot be empty".to_string()));
    }

    if config.archive_name.is_empty() {
        return Err(ConfigError::Validation(
            "archive_name cannot be empty".to_string(),
        ));
    }

    if config.archive_name.contains('/') || config.archive_name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "archive_name must be a bare file name, got '{}'",
            config.archive_name
        )));
    }

    Ok(())
}
