/// Category definitions for scan outcomes
///
/// Every scanned URL lands in exactly one of these buckets.
use std::fmt;

/// Outcome bucket for a scanned site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    // ===== Platform Matches =====
    /// Site built on Wix (generator meta tag)
    Wix,

    /// Site built on WordPress (comment form markers)
    WordPress,

    // ===== Non-platform Outcomes =====
    /// Site answered but refused or restricted access (401, 403, 429, restricted 202)
    Protected,

    /// Site not found, server error, or no HTTP response at all
    Error,

    /// Site answered normally but no known platform marker was found
    Unclassified,
}

impl Category {
    /// All categories in reporting order
    pub const ALL: [Category; 5] = [
        Category::Wix,
        Category::WordPress,
        Category::Protected,
        Category::Error,
        Category::Unclassified,
    ];

    /// Returns true if this category is a detected platform
    pub fn is_platform(&self) -> bool {
        matches!(self, Self::Wix | Self::WordPress)
    }

    /// Short label used in progress output and summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wix => "Wix",
            Self::WordPress => "WordPress",
            Self::Protected => "Protected",
            Self::Error => "Error",
            Self::Unclassified => "NoTemplate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Running count of classifications per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub wix: usize,
    pub wordpress: usize,
    pub protected: usize,
    pub error: usize,
    pub unclassified: usize,
}

impl CategoryCounts {
    /// Returns the count for one category
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Wix => self.wix,
            Category::WordPress => self.wordpress,
            Category::Protected => self.protected,
            Category::Error => self.error,
            Category::Unclassified => self.unclassified,
        }
    }

    /// Adds one to the count for a category
    pub fn increment(&mut self, category: Category) {
        let slot = match category {
            Category::Wix => &mut self.wix,
            Category::WordPress => &mut self.wordpress,
            Category::Protected => &mut self.protected,
            Category::Error => &mut self.error,
            Category::Unclassified => &mut self.unclassified,
        };
        *slot += 1;
    }

    /// Sum across all categories
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

impl fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Category::ALL
            .iter()
            .map(|c| format!("{}: {}", c.label(), self.get(*c)))
            .collect();
        write!(f, "{}", parts.join(" | "))
    }
}
