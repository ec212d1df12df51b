use crate::config::types::{Config, InputConfig, OutputConfig, ScanConfig};
use crate::ConfigError;

/// Upper bound on simultaneously in-flight fetches
const MAX_CONCURRENCY_LIMIT: usize = 1000;

/// Upper bound on the per-request timeout, in seconds
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Upper bound on redirects followed per request
const MAX_REDIRECTS: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scan_config(&config.scan)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates scan engine configuration
fn validate_scan_config(config: &ScanConfig) -> Result<(), ConfigError> {
    if config.concurrency_limit < 1 || config.concurrency_limit > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "concurrency_limit must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.concurrency_limit
        )));
    }

    if config.timeout_seconds < 1 || config.timeout_seconds > MAX_TIMEOUT_SECONDS {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECONDS, config.timeout_seconds
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be at most {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.user_agents_file {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "user_agents_file cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.output_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_path cannot be empty".to_string(),
            ));
        }
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
