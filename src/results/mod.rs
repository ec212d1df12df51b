//! Result model and aggregation
//!
//! This module holds the per-URL scan outcome and the shared store the
//! scanner merges outcomes into.
//!
//! # Components
//!
//! - `Category`: the five mutually exclusive outcome buckets
//! - `Classification`: the immutable decision record for one scanned URL
//! - `ResultAggregator`: thread-safe counts, per-category lists and the scanned-set

mod aggregator;
mod category;
mod classification;

// Re-export main types
pub use aggregator::{ResultAggregator, ScanSnapshot};
pub use category::{Category, CategoryCounts};
pub use classification::{truncate_chars, Classification};
