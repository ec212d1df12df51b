use crate::results::Category;
use chrono::{DateTime, Local};

/// The decision record produced once per scanned URL
///
/// A classification is never modified after it is created; it is appended
/// once to the aggregator list for its category.
#[derive(Debug, Clone)]
pub struct Classification {
    /// The normalized (scheme-prefixed) URL
    pub url: String,

    /// HTTP status code, or 0 when no HTTP response was obtained
    pub status_code: u16,

    /// Outcome bucket
    pub category: Category,

    /// Human-readable basis for the decision
    pub indicator: String,

    /// Extracted page title or a fixed sentinel
    pub title: String,

    /// When the decision was made
    pub timestamp: DateTime<Local>,
}

impl Classification {
    /// Creates a classification stamped with the current local time
    pub fn new(
        url: impl Into<String>,
        status_code: u16,
        category: Category,
        indicator: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            status_code,
            category,
            indicator: indicator.into(),
            title: title.into(),
            timestamp: Local::now(),
        }
    }

    /// Returns true if no HTTP response was obtained for this URL
    pub fn is_network_failure(&self) -> bool {
        self.status_code == 0
    }
}

/// Truncates a string to at most `max` characters
///
/// Counts characters rather than bytes so multibyte text is never split.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
