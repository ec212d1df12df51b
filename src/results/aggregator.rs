//! Thread-safe result store shared by all scan tasks
//!
//! One mutex guards the counts, the per-category lists and the scanned-set
//! together, so a URL can never be counted without appearing in its list,
//! and the duplicate check and the mark happen as a single step.

use crate::results::{Category, CategoryCounts, Classification};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything the aggregator tracks, behind one lock
#[derive(Debug, Default)]
struct AggregateState {
    counts: CategoryCounts,
    lists: HashMap<Category, Vec<Classification>>,
    scanned: HashSet<String>,
    recorded: HashSet<String>,
}

/// Shared store of classifications, per-category counts and scanned URLs
#[derive(Debug, Default)]
pub struct ResultAggregator {
    state: Mutex<AggregateState>,
}

impl ResultAggregator {
    /// Creates an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state
    ///
    /// A writer that panicked while holding the lock cannot have left a
    /// half-applied update (each update is a few infallible pushes), so a
    /// poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, AggregateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a classification to its category list and bumps the count
    ///
    /// The URL is added to the scanned-set if it is not already there.
    ///
    /// # Returns
    ///
    /// * `true` - The classification was recorded
    /// * `false` - A classification for this URL was already recorded; nothing changed
    pub fn record(&self, classification: Classification) -> bool {
        let mut state = self.lock();

        if !state.recorded.insert(classification.url.clone()) {
            tracing::warn!(
                "Ignoring second classification for {}",
                classification.url
            );
            return false;
        }

        state.scanned.insert(classification.url.clone());
        state.counts.increment(classification.category);
        state
            .lists
            .entry(classification.category)
            .or_default()
            .push(classification);

        true
    }

    /// Returns true if the URL is already in the scanned-set
    pub fn already_scanned(&self, url: &str) -> bool {
        self.lock().scanned.contains(url)
    }

    /// Adds the URL to the scanned-set
    pub fn mark_scanned(&self, url: &str) {
        self.lock().scanned.insert(url.to_string());
    }

    /// Checks and marks a URL in one step
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not yet scanned and is now claimed by the caller
    /// * `false` - The URL was already scanned; the caller must skip it
    pub fn try_claim(&self, url: &str) -> bool {
        self.lock().scanned.insert(url.to_string())
    }

    /// Returns the current per-category counts
    pub fn counts(&self) -> CategoryCounts {
        self.lock().counts
    }

    /// Returns a copy of the full aggregate state
    pub fn snapshot(&self) -> ScanSnapshot {
        let state = self.lock();
        ScanSnapshot {
            counts: state.counts,
            lists: state.lists.clone(),
            scanned: state.scanned.clone(),
        }
    }
}

/// Point-in-time copy of the aggregate state
#[derive(Debug, Clone, Default)]
pub struct ScanSnapshot {
    /// Per-category counts
    pub counts: CategoryCounts,

    /// Per-category classifications in completion order
    pub lists: HashMap<Category, Vec<Classification>>,

    /// Every URL claimed during the run
    pub scanned: HashSet<String>,
}

impl ScanSnapshot {
    /// Returns the classifications recorded for one category
    pub fn sites(&self, category: Category) -> &[Classification] {
        self.lists
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of recorded classifications across all categories
    pub fn total_recorded(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Returns true if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.total_recorded() == 0
    }
}
