//! Scan coordinator - bounded-concurrency fetch/classify/record loop
//!
//! This module contains the main scan loop, including:
//! - Enforcing the concurrency limit with a semaphore
//! - Skipping URLs already in the scanned-set
//! - Running fetch → classify → record for each URL on its own task
//! - Guaranteeing exactly one record per dispatched URL
//! - Stopping dispatch on interrupt and draining in-flight tasks

use crate::config::ScanConfig;
use crate::results::{Category, Classification, ResultAggregator, ScanSnapshot};
use crate::scanner::classifier::classify;
use crate::scanner::fetcher::{Fetcher, HttpFetcher};
use crate::scanner::progress::ProgressReporter;
use crate::scanner::shutdown::ShutdownListener;
use crate::scanner::user_agents::UserAgentPool;
use crate::target::normalize_target;
use crate::SieveError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Main scan coordinator structure
pub struct ScanCoordinator {
    fetcher: Arc<dyn Fetcher>,
    user_agents: Arc<UserAgentPool>,
    aggregator: Arc<ResultAggregator>,
    concurrency_limit: usize,
    progress: Option<ProgressReporter>,
    shutdown: Option<ShutdownListener>,
}

impl ScanCoordinator {
    /// Creates a coordinator around an existing fetcher
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Performs the HTTP request for each URL
    /// * `user_agents` - Pool each request's User-Agent is drawn from
    /// * `concurrency_limit` - Maximum fetches in flight at once (at least 1)
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        user_agents: UserAgentPool,
        concurrency_limit: usize,
    ) -> Self {
        Self {
            fetcher,
            user_agents: Arc::new(user_agents),
            aggregator: Arc::new(ResultAggregator::new()),
            concurrency_limit: concurrency_limit.max(1),
            progress: None,
            shutdown: None,
        }
    }

    /// Creates a coordinator with an HTTP fetcher built from the scan config
    ///
    /// # Returns
    ///
    /// * `Ok(ScanCoordinator)` - Ready to run
    /// * `Err(SieveError)` - The HTTP client could not be built
    pub fn from_config(config: &ScanConfig, user_agents: UserAgentPool) -> Result<Self, SieveError> {
        let fetcher = HttpFetcher::new(config.timeout(), config.max_redirects)?;
        Ok(Self::new(
            Arc::new(fetcher),
            user_agents,
            config.concurrency_limit,
        ))
    }

    /// Reports progress to the given reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Stops dispatching new URLs once the listener fires
    pub fn with_shutdown(mut self, shutdown: ShutdownListener) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// The store results are recorded into
    pub fn aggregator(&self) -> Arc<ResultAggregator> {
        Arc::clone(&self.aggregator)
    }

    /// Scans every URL and returns the aggregate snapshot
    ///
    /// Each target is normalized, then waits for a concurrency slot. Once it
    /// has a slot it is claimed in the scanned-set; targets already claimed
    /// are skipped without a record. Every claimed URL produces exactly one
    /// classification, even if its task panics.
    ///
    /// If shutdown is triggered, URLs that have not yet been dispatched are
    /// dropped and the snapshot reflects only the dispatched ones.
    pub async fn run(&self, urls: &[String]) -> ScanSnapshot {
        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let mut shutdown = self.shutdown.clone();
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;
        let mut skipped = 0usize;

        tracing::info!(
            "Scanning {} URLs with concurrency limit {}",
            urls.len(),
            self.concurrency_limit
        );

        for raw in urls {
            if shutdown.as_ref().is_some_and(ShutdownListener::is_triggered) {
                break;
            }

            let permit = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        tracing::error!("Concurrency limiter closed: {}", e);
                        break;
                    }
                },
            };

            let url = normalize_target(raw);
            if !self.aggregator.try_claim(&url) {
                tracing::debug!("Skipping already scanned URL: {}", url);
                skipped += 1;
                if let Some(progress) = &self.progress {
                    progress.skip();
                }
                continue;
            }

            dispatched += 1;
            tasks.spawn(scan_one(
                url,
                permit,
                Arc::clone(&self.fetcher),
                Arc::clone(&self.user_agents),
                Arc::clone(&self.aggregator),
                self.progress.clone(),
            ));
        }

        if dispatched + skipped < urls.len() {
            tracing::warn!(
                "Scan interrupted: {} of {} URLs not dispatched, waiting for {} in-flight requests",
                urls.len() - dispatched - skipped,
                urls.len(),
                tasks.len()
            );
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Scan task ended abnormally: {}", e);
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        let snapshot = self.aggregator.snapshot();
        tracing::info!(
            "Scan completed: {} recorded, {} duplicates skipped in {:?}",
            snapshot.total_recorded(),
            skipped,
            start_time.elapsed()
        );

        snapshot
    }
}

/// Waits for shutdown, or forever when no listener is configured
async fn wait_for_shutdown(listener: &mut Option<ShutdownListener>) {
    match listener {
        Some(listener) => listener.notified().await,
        None => std::future::pending().await,
    }
}

/// Fetches, classifies and records one claimed URL
async fn scan_one(
    url: String,
    permit: OwnedSemaphorePermit,
    fetcher: Arc<dyn Fetcher>,
    user_agents: Arc<UserAgentPool>,
    aggregator: Arc<ResultAggregator>,
    progress: Option<ProgressReporter>,
) {
    let _permit = permit;
    let mut guard = RecordGuard::new(url, aggregator, progress);

    let user_agent = user_agents.pick();
    let outcome = fetcher.fetch(guard.url(), &user_agent).await;
    let classification = classify(guard.url(), &outcome);

    tracing::debug!(
        "{} -> {} ({}): {}",
        classification.url,
        classification.category,
        classification.status_code,
        classification.indicator
    );

    guard.complete(classification);
}

/// Records exactly one classification for a URL when dropped
///
/// If the task finished normally the completed classification is recorded.
/// If it unwound (panic) or was cancelled first, a degraded `Error`
/// classification is recorded in its place.
struct RecordGuard {
    url: String,
    aggregator: Arc<ResultAggregator>,
    progress: Option<ProgressReporter>,
    result: Option<Classification>,
}

impl RecordGuard {
    fn new(
        url: String,
        aggregator: Arc<ResultAggregator>,
        progress: Option<ProgressReporter>,
    ) -> Self {
        Self {
            url,
            aggregator,
            progress,
            result: None,
        }
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn complete(&mut self, classification: Classification) {
        self.result = Some(classification);
    }
}

impl Drop for RecordGuard {
    fn drop(&mut self) {
        let classification = self.result.take().unwrap_or_else(|| {
            let reason = if std::thread::panicking() {
                "scan task panicked"
            } else {
                "scan task cancelled"
            };
            tracing::warn!("{} for {}", reason, self.url);
            Classification::new(
                self.url.clone(),
                0,
                Category::Error,
                format!("Unexpected error: {}", reason),
                "Unknown Error",
            )
        });

        self.aggregator.record(classification);

        if let Some(progress) = &self.progress {
            progress.record(&self.aggregator.counts());
        }
    }
}
