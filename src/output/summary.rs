//! End-of-run summary
//!
//! The summary is built as a string by `format_summary` so it can be tested
//! and is printed to stdout by `print_summary`.

use crate::output::files::group_by_status;
use crate::results::{truncate_chars, Category, ScanSnapshot};
use std::fmt::Write;
use std::time::Duration;

/// Indicators longer than this are cut in the detailed listing
const INDICATOR_PREVIEW_CHARS: usize = 50;

/// Human-readable name for a status code within a category
///
/// # Arguments
///
/// * `category` - Protected or Error; other categories use the generic form
/// * `status_code` - The recorded status code (0 for network failures)
///
/// # Returns
///
/// A short description such as "Forbidden/Blocked" or "Status 418"
pub fn status_label(category: Category, status_code: u16) -> String {
    let known = match (category, status_code) {
        (Category::Protected, 202) => Some("Accepted/Maintenance"),
        (Category::Protected, 401) => Some("Authentication Required"),
        (Category::Protected, 403) => Some("Forbidden/Blocked"),
        (Category::Protected, 429) => Some("Rate Limited"),
        (Category::Error, 0) => Some("Network/DNS Error"),
        (Category::Error, 404) => Some("Not Found"),
        (Category::Error, 500) => Some("Internal Server Error"),
        (Category::Error, 502) => Some("Bad Gateway"),
        (Category::Error, 503) => Some("Service Unavailable"),
        (Category::Error, 504) => Some("Gateway Timeout"),
        _ => None,
    };

    match known {
        Some(label) => label.to_string(),
        None if category == Category::Error => format!("Error {}", status_code),
        None => format!("Status {}", status_code),
    }
}

fn heading(category: Category) -> &'static str {
    match category {
        Category::Wix => "Wix sites",
        Category::WordPress => "WordPress sites",
        Category::Protected => "Protected sites",
        Category::Error => "Error sites",
        Category::Unclassified => "Other platform sites",
    }
}

/// Formats the summary of a scan
///
/// # Arguments
///
/// * `snapshot` - The aggregated scan results
/// * `elapsed` - Wall-clock duration of the scan
///
/// # Returns
///
/// The formatted multi-line summary
pub fn format_summary(snapshot: &ScanSnapshot, elapsed: Duration) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = write_summary(&mut out, snapshot, elapsed);
    out
}

fn write_summary(out: &mut String, snapshot: &ScanSnapshot, elapsed: Duration) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "SUMI-SIEVE SCAN SUMMARY")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "Total URLs scanned: {}", snapshot.scanned.len())?;
    for category in Category::ALL {
        writeln!(out, "{}: {}", heading(category), snapshot.counts.get(category))?;
    }

    // Status breakdowns
    for category in [Category::Protected, Category::Error] {
        let sites = snapshot.sites(category);
        if sites.is_empty() {
            continue;
        }

        writeln!(out)?;
        writeln!(out, "{} breakdown:", heading(category))?;
        for (status, group) in group_by_status(sites) {
            writeln!(
                out,
                "  {}: {} sites ({})",
                status,
                group.len(),
                status_label(category, status)
            )?;
        }
    }

    writeln!(out, "{}", "-".repeat(70))?;

    for category in Category::ALL {
        let sites = snapshot.sites(category);
        if sites.is_empty() {
            continue;
        }

        writeln!(out)?;
        writeln!(out, "{} ({}):", heading(category), sites.len())?;
        for (i, site) in sites.iter().enumerate() {
            write!(out, "  [{}] {} | Status: {}", i + 1, site.url, site.status_code)?;
            if matches!(category, Category::Protected | Category::Error) {
                write!(
                    out,
                    " | {}...",
                    truncate_chars(&site.indicator, INDICATOR_PREVIEW_CHARS)
                )?;
            }
            writeln!(out)?;
        }
    }

    if snapshot.is_empty() {
        writeln!(out)?;
        writeln!(out, "No sites were scanned.")?;
    }

    writeln!(out)?;
    writeln!(out, "Elapsed: {:.2}s", elapsed.as_secs_f64())?;
    Ok(())
}

/// Prints the summary to stdout
pub fn print_summary(snapshot: &ScanSnapshot, elapsed: Duration) {
    print!("{}", format_summary(snapshot, elapsed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Classification, ResultAggregator};

    fn snapshot() -> ScanSnapshot {
        let aggregator = ResultAggregator::new();
        aggregator.record(Classification::new(
            "https://wix.example",
            200,
            Category::Wix,
            "Wix.com Website Builder",
            "Home",
        ));
        aggregator.record(Classification::new(
            "https://denied.example",
            403,
            Category::Protected,
            "Access denied (403 Forbidden) - website may be blocked or protected",
            "Access Forbidden",
        ));
        aggregator.record(Classification::new(
            "https://down.example",
            0,
            Category::Error,
            "Network error (Timeout): operation timed out",
            "Connection Error",
        ));
        aggregator.snapshot()
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(Category::Protected, 202), "Accepted/Maintenance");
        assert_eq!(status_label(Category::Protected, 401), "Authentication Required");
        assert_eq!(status_label(Category::Protected, 403), "Forbidden/Blocked");
        assert_eq!(status_label(Category::Protected, 429), "Rate Limited");
        assert_eq!(status_label(Category::Protected, 418), "Status 418");
        assert_eq!(status_label(Category::Error, 0), "Network/DNS Error");
        assert_eq!(status_label(Category::Error, 404), "Not Found");
        assert_eq!(status_label(Category::Error, 503), "Service Unavailable");
        assert_eq!(status_label(Category::Error, 599), "Error 599");
    }

    #[test]
    fn test_summary_counts() {
        let text = format_summary(&snapshot(), Duration::from_millis(1500));

        assert!(text.contains("Total URLs scanned: 3"));
        assert!(text.contains("Wix sites: 1"));
        assert!(text.contains("WordPress sites: 0"));
        assert!(text.contains("Protected sites: 1"));
        assert!(text.contains("Error sites: 1"));
        assert!(text.contains("Elapsed: 1.50s"));
    }

    #[test]
    fn test_summary_breakdowns() {
        let text = format_summary(&snapshot(), Duration::ZERO);

        assert!(text.contains("Protected sites breakdown:\n  403: 1 sites (Forbidden/Blocked)"));
        assert!(text.contains("Error sites breakdown:\n  0: 1 sites (Network/DNS Error)"));
    }

    #[test]
    fn test_indicator_truncated_in_listing() {
        let text = format_summary(&snapshot(), Duration::ZERO);

        let expected = format!(
            "[1] https://denied.example | Status: 403 | {}...",
            truncate_chars(
                "Access denied (403 Forbidden) - website may be blocked or protected",
                50
            )
        );
        assert!(text.contains(&expected));
        assert!(!text.contains("blocked or protected"));
        assert!(text.contains("[1] https://wix.example | Status: 200\n"));
    }

    #[test]
    fn test_empty_summary() {
        let text = format_summary(&ScanSnapshot::default(), Duration::ZERO);
        assert!(text.contains("Total URLs scanned: 0"));
        assert!(text.contains("No sites were scanned."));
        assert!(!text.contains("breakdown"));
    }
}
