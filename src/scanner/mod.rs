//! Scanner module for fetching and classifying target sites
//!
//! This module contains the scan pipeline:
//! - HTTP fetching with timeout and redirect limits
//! - Classification of each response into a `Category`
//! - User-agent rotation
//! - The bounded-concurrency coordinator
//! - Progress display and interrupt handling

mod classifier;
mod coordinator;
mod fetcher;
mod progress;
mod shutdown;
mod user_agents;

pub use classifier::{classify, BodyParseError, MAX_ERROR_MESSAGE_CHARS, NO_TITLE, UNKNOWN_TITLE};
pub use coordinator::ScanCoordinator;
pub use fetcher::{build_http_client, FetchOutcome, Fetcher, HttpFetcher, TransportFailureKind};
pub use progress::{ProgressReporter, SuspendedStderr};
pub use shutdown::{install_signal_handlers, Shutdown, ShutdownListener};
pub use user_agents::{UserAgentPool, DEFAULT_USER_AGENT};
