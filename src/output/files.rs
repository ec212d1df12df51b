//! Result file generation
//!
//! Results go either to one combined file with a section per category, or
//! to one file per category inside an output directory. Only categories
//! that have at least one site are written.

use crate::config::OutputConfig;
use crate::output::{OutputError, OutputResult};
use crate::results::{Category, Classification, ScanSnapshot};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const COMBINED_TITLE: &str = "SUMI-SIEVE SCAN RESULTS";

/// Writes the snapshot according to the output configuration
///
/// # Arguments
///
/// * `snapshot` - The aggregated scan results
/// * `config` - Output destination settings
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The files that were written
/// * `Err(OutputError)` - A file or directory could not be written
pub fn write_results(snapshot: &ScanSnapshot, config: &OutputConfig) -> OutputResult<Vec<PathBuf>> {
    match &config.output_path {
        Some(path) => {
            write_file(path, &format_combined(snapshot))?;
            tracing::info!("All results saved to {}", path.display());
            Ok(vec![path.clone()])
        }
        None => write_split(snapshot, &config.output_dir),
    }
}

/// Writes one file per non-empty category into `dir`
fn write_split(snapshot: &ScanSnapshot, dir: &Path) -> OutputResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for category in Category::ALL {
        let sites = snapshot.sites(category);
        if sites.is_empty() {
            continue;
        }

        let path = dir.join(category_file_name(category));
        write_file(&path, &format_category_file(category, sites))?;
        tracing::info!("{} {} sites -> {}", sites.len(), category.label(), path.display());
        written.push(path);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> OutputResult<()> {
    let to_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(to_error)?;
    file.write_all(contents.as_bytes()).map_err(to_error)?;
    Ok(())
}

/// File name used for a category in split mode
pub fn category_file_name(category: Category) -> &'static str {
    match category {
        Category::Wix => "wix_sites.txt",
        Category::WordPress => "wordpress.txt",
        Category::Protected => "protected_sites.txt",
        Category::Error => "error_sites.txt",
        Category::Unclassified => "no_template.txt",
    }
}

/// Section title and underline width in the combined file
fn combined_section(category: Category) -> (&'static str, usize) {
    match category {
        Category::Wix => ("WIX SITES:", 20),
        Category::WordPress => ("WORDPRESS SITES:", 20),
        Category::Protected => ("PROTECTED SITES (Security/Access Issues):", 45),
        Category::Error => ("ERROR SITES (Not Found/Server Issues):", 45),
        Category::Unclassified => ("NO TEMPLATE SITES (Other Platforms):", 35),
    }
}

/// Header text and rule width for a split-mode file
fn split_header(category: Category) -> (&'static str, usize) {
    match category {
        Category::Wix => ("Sumi-Sieve - Wix.com Websites", 30),
        Category::WordPress => ("Sumi-Sieve - WordPress Websites", 30),
        Category::Protected => (
            "Sumi-Sieve - Protected/Restricted Websites\nStatus: 202, 403, 401, 429",
            40,
        ),
        Category::Error => (
            "Sumi-Sieve - Error/Unreachable Websites\nStatus: 404, 5xx, Network errors",
            40,
        ),
        Category::Unclassified => ("Sumi-Sieve - Other Platform Websites", 35),
    }
}

/// Formats every non-empty category into one document
pub fn format_combined(snapshot: &ScanSnapshot) -> String {
    let mut out = String::new();
    out.push_str(COMBINED_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for category in Category::ALL {
        let sites = snapshot.sites(category);
        if sites.is_empty() {
            continue;
        }

        let (title, width) = combined_section(category);
        out.push_str(title);
        out.push('\n');
        out.push_str(&"-".repeat(width));
        out.push('\n');
        for site in sites {
            out.push_str(&site.url);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Formats the split-mode file for one category
///
/// Protected and error sites are grouped by status code in ascending order;
/// the other categories are a flat list in completion order.
pub fn format_category_file(category: Category, sites: &[Classification]) -> String {
    let (header, width) = split_header(category);
    let mut out = String::new();
    out.push_str(header);
    out.push('\n');
    out.push_str(&"=".repeat(width));
    out.push_str("\n\n");

    match category {
        Category::Protected | Category::Error => {
            for (status, group) in group_by_status(sites) {
                if status == 0 {
                    out.push_str("--- NETWORK ERRORS ---\n");
                } else {
                    out.push_str(&format!("--- STATUS {} ---\n", status));
                }
                for site in group {
                    out.push_str(&site.url);
                    out.push('\n');
                }
                out.push('\n');
            }
        }
        _ => {
            for site in sites {
                out.push_str(&site.url);
                out.push('\n');
            }
        }
    }

    out
}

/// Groups sites by status code, keys ascending, completion order within a group
pub(crate) fn group_by_status(sites: &[Classification]) -> BTreeMap<u16, Vec<&Classification>> {
    let mut groups: BTreeMap<u16, Vec<&Classification>> = BTreeMap::new();
    for site in sites {
        groups.entry(site.status_code).or_default().push(site);
    }
    groups
}
