//! Target handling module for Sumi-Sieve
//!
//! This module turns the user's input sources (command-line URLs and
//! newline-delimited list files) into the ordered list of scan targets, and
//! provides the scheme normalization applied to every target before it is
//! fetched.

mod list;
mod normalize;

pub use list::read_list_file;
pub use normalize::normalize_target;

use std::path::Path;

/// Collects scan targets from the command line and an optional list file
///
/// Command-line URLs come first, followed by the file's entries, both in
/// their original order. Duplicates are kept; they are skipped at dispatch
/// time by the scanner. A missing or unreadable file is reported and
/// contributes nothing.
///
/// # Arguments
///
/// * `cli_urls` - URLs given directly on the command line
/// * `file` - Optional path to a newline-delimited URL list
///
/// # Returns
///
/// The combined list of raw (not yet normalized) targets
pub fn resolve_targets(cli_urls: &[String], file: Option<&Path>) -> Vec<String> {
    let mut targets: Vec<String> = cli_urls
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(path) = file {
        match read_list_file(path) {
            Ok(urls) => {
                tracing::info!("Loaded {} URLs from {}", urls.len(), path.display());
                targets.extend(urls);
            }
            Err(e) => {
                tracing::error!("{}", e);
            }
        }
    }

    targets
}
