//! HTTP fetcher implementation
//!
//! This module performs the single GET request made for each scan target:
//! - Building one shared HTTP client with the run's timeout and redirect limit
//! - Sending the request with a per-request User-Agent header
//! - Reading the body eagerly
//! - Classifying transport failures (timeout, connection, redirect overflow)
//!
//! HTTP status codes are not interpreted here. Any response that arrives,
//! including 4xx and 5xx, is a `FetchOutcome::Success`.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{redirect::Policy, Client};
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Kind of failure that prevented any HTTP response from being obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailureKind {
    /// The request did not complete within the timeout
    Timeout,

    /// DNS resolution failed or the connection was refused/reset
    ConnectionError,

    /// The redirect chain exceeded the configured limit
    TooManyRedirects,

    /// Anything else (invalid URL, TLS or protocol errors, ...)
    Other,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "Timeout",
            Self::ConnectionError => "ConnectionError",
            Self::TooManyRedirects => "TooManyRedirects",
            Self::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// An HTTP response was received (any status)
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body as text
        body: String,
    },

    /// No HTTP response could be obtained
    TransportFailure {
        /// What went wrong
        kind: TransportFailureKind,
        /// Error description
        message: String,
    },
}

impl FetchOutcome {
    /// Shorthand for a transport failure outcome
    pub fn failure(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self::TransportFailure {
            kind,
            message: message.into(),
        }
    }
}

/// Performs one HTTP GET for a scan target
///
/// Implementations must not retry; each call is one attempt.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` sending `user_agent` as the User-Agent header
    async fn fetch(&self, url: &str, user_agent: &str) -> FetchOutcome;
}

/// Builds the HTTP client shared by every fetch in a run
///
/// # Arguments
///
/// * `timeout` - Total per-request timeout (connect, redirects and body)
/// * `max_redirects` - Redirects followed before giving up
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration, max_redirects: usize) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given timeout and redirect limit
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout, max_redirects)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> FetchOutcome {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                return FetchOutcome::failure(
                    TransportFailureKind::Other,
                    format!("invalid URL {}: {}", url, e),
                );
            }
        };

        let response = match self
            .client
            .get(parsed)
            .header(USER_AGENT, user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_failure(&e),
        };

        let status_code = response.status().as_u16();

        match response.text().await {
            Ok(body) => FetchOutcome::Success { status_code, body },
            Err(e) => transport_failure(&e),
        }
    }
}

/// Maps a reqwest error onto a transport failure outcome
fn transport_failure(error: &reqwest::Error) -> FetchOutcome {
    let kind = if error.is_timeout() {
        TransportFailureKind::Timeout
    } else if error.is_redirect() {
        TransportFailureKind::TooManyRedirects
    } else if error.is_connect() {
        TransportFailureKind::ConnectionError
    } else {
        TransportFailureKind::Other
    };

    FetchOutcome::failure(kind, error_chain(error))
}

/// Joins an error and its sources into one message
///
/// reqwest's top-level message rarely says what actually failed; the
/// underlying cause (refused, DNS, certificate) is in the source chain.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
