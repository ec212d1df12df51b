//! Output module for scan results
//!
//! This module handles:
//! - Writing categorized result sets to text files
//! - Formatting and printing the end-of-run summary

mod files;
mod summary;

pub use files::{format_category_file, format_combined, write_results, category_file_name};
pub use summary::{format_summary, print_summary, status_label};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
