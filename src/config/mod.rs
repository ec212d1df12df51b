//! Configuration module for Sumi-Sieve
//!
//! Scan options come from an optional TOML file and are then overridden by
//! command-line flags. Every key has a default, so an empty file (or no file
//! at all) yields a usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use sumi_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sieve.toml")).unwrap();
//! println!("Concurrency limit: {}", config.scan.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, InputConfig, OutputConfig, ScanConfig, DEFAULT_USER_AGENTS_FILE};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
