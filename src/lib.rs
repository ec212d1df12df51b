//! Sumi-Sieve: a concurrent site platform scanner
//!
//! This crate fetches a batch of target URLs under a bounded concurrency limit,
//! classifies each responding site (Wix, WordPress, protected, error or
//! unclassified) from its HTTP status and HTML markers, and aggregates the
//! results for reporting.

pub mod config;
pub mod output;
pub mod results;
pub mod scanner;
pub mod target;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Sieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

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

    #[error("No URLs given; use -u/--urls or -f/--file")]
    NoTargets,
}

/// Errors raised while loading URL or user-agent lists
#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for Sumi-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use results::{Category, Classification, ResultAggregator, ScanSnapshot};
pub use scanner::{classify, FetchOutcome, ScanCoordinator, UserAgentPool};
pub use target::normalize_target;
