//! Site classifier
//!
//! Turns one fetch outcome into one `Classification`. The decision is a
//! single ordered match over the outcome and status code, first match wins:
//!
//! | Outcome | Category |
//! |---------|----------|
//! | Transport failure | Error (status 0) |
//! | HTTP 404 | Error |
//! | HTTP 403 | Protected |
//! | HTTP 401 | Protected |
//! | HTTP 429 | Protected |
//! | HTTP 5xx | Error |
//! | Other HTTP 4xx | Error |
//! | HTTP 202 | platform markers, else Protected |
//! | Any other status | platform markers, else Unclassified |
//!
//! Platform markers: both the `.comment-form-comment` and `#commentform`
//! elements mean WordPress; otherwise a `<meta name="generator">` whose
//! content contains `wix.com` (any case) means Wix.
//!
//! Classification reads nothing but its arguments and never fails.

use crate::results::{truncate_chars, Category, Classification};
use crate::scanner::fetcher::FetchOutcome;
use scraper::{Html, Selector};
use thiserror::Error;

/// Longest transport error message carried into an indicator
pub const MAX_ERROR_MESSAGE_CHARS: usize = 100;

/// Title used when a parsed page has no usable `<title>`
pub const NO_TITLE: &str = "No title";

/// Title used when the body could not be parsed
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Body prefix inspected for binary content
const BINARY_SNIFF_BYTES: usize = 1024;

/// Substring of the generator meta tag identifying Wix
const WIX_GENERATOR_MARKER: &str = "wix.com";

/// Reasons a response body cannot be inspected as HTML
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyParseError {
    #[error("binary content (NUL byte at offset {offset})")]
    Binary { offset: usize },
}

/// Platform detected from page markers
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlatformMatch {
    WordPress,
    Wix { generator: String },
    None,
}

/// Classifies a fetched URL
///
/// # Arguments
///
/// * `url` - The normalized URL that was fetched
/// * `outcome` - What the fetcher obtained for it
///
/// # Returns
///
/// Exactly one `Classification`; this function is total over all outcomes
///
/// # Example
///
/// ```
/// use sumi_sieve::scanner::{classify, FetchOutcome};
/// use sumi_sieve::Category;
///
/// let outcome = FetchOutcome::Success { status_code: 404, body: String::new() };
/// let result = classify("https://example.com", &outcome);
/// assert_eq!(result.category, Category::Error);
/// ```
pub fn classify(url: &str, outcome: &FetchOutcome) -> Classification {
    match outcome {
        FetchOutcome::TransportFailure { kind, message } => Classification::new(
            url,
            0,
            Category::Error,
            format!(
                "Network error ({}): {}",
                kind,
                truncate_chars(message, MAX_ERROR_MESSAGE_CHARS)
            ),
            "Connection Error",
        ),

        FetchOutcome::Success { status_code, body } => match *status_code {
            404 => Classification::new(
                url,
                404,
                Category::Error,
                "Website not found (404 Not Found)",
                "Page Not Found",
            ),
            403 => Classification::new(
                url,
                403,
                Category::Protected,
                "Access denied (403 Forbidden) - website may be blocked or protected",
                "Access Forbidden",
            ),
            401 => Classification::new(
                url,
                401,
                Category::Protected,
                "Authentication required (401 Unauthorized)",
                "Authentication Required",
            ),
            429 => Classification::new(
                url,
                429,
                Category::Protected,
                "Rate limit exceeded (429 Too Many Requests) - website restricts access",
                "Rate Limited",
            ),
            code if code >= 500 => Classification::new(
                url,
                code,
                Category::Error,
                format!("Server error ({}) - website is having server problems", code),
                "Server Error",
            ),
            code @ 400..=499 => Classification::new(
                url,
                code,
                Category::Error,
                format!("HTTP Error ({})", code),
                "Error",
            ),
            202 => classify_accepted(url, body),
            code => classify_content(url, code, body),
        },
    }
}

/// Handles HTTP 202: platform markers, otherwise treated as restricted
fn classify_accepted(url: &str, body: &str) -> Classification {
    let document = match parse_document(body) {
        Ok(document) => document,
        Err(e) => {
            tracing::debug!("Could not parse 202 body for {}: {}", url, e);
            return Classification::new(
                url,
                202,
                Category::Protected,
                "Status 202 - unparseable body",
                UNKNOWN_TITLE,
            );
        }
    };

    let title = extract_title(&document);

    match detect_platform(&document) {
        PlatformMatch::WordPress => Classification::new(
            url,
            202,
            Category::WordPress,
            "WordPress with status 202 (comment-form-comment + commentform)",
            title,
        ),
        PlatformMatch::Wix { generator } => Classification::new(
            url,
            202,
            Category::Wix,
            format!("Wix with status 202 ({})", generator),
            title,
        ),
        PlatformMatch::None => Classification::new(
            url,
            202,
            Category::Protected,
            "Protected (202) - accepted but restricted",
            title,
        ),
    }
}

/// Handles every status not matched earlier: platform markers, otherwise unclassified
fn classify_content(url: &str, status_code: u16, body: &str) -> Classification {
    let document = match parse_document(body) {
        Ok(document) => document,
        Err(e) => {
            return Classification::new(
                url,
                status_code,
                Category::Unclassified,
                format!("Unparseable body: {}", e),
                UNKNOWN_TITLE,
            );
        }
    };

    let title = extract_title(&document);

    match detect_platform(&document) {
        PlatformMatch::WordPress => Classification::new(
            url,
            status_code,
            Category::WordPress,
            "comment-form-comment class and commentform id found",
            title,
        ),
        PlatformMatch::Wix { generator } => {
            Classification::new(url, status_code, Category::Wix, generator, title)
        }
        PlatformMatch::None => Classification::new(
            url,
            status_code,
            Category::Unclassified,
            "No known platform marker found",
            title,
        ),
    }
}

/// Parses a response body as an HTML document
///
/// The HTML parser itself accepts any text, so only binary bodies (a NUL
/// byte near the start) are rejected.
fn parse_document(body: &str) -> Result<Html, BodyParseError> {
    if let Some(offset) = body
        .bytes()
        .take(BINARY_SNIFF_BYTES)
        .position(|byte| byte == 0)
    {
        return Err(BodyParseError::Binary { offset });
    }

    Ok(Html::parse_document(body))
}

/// Checks a parsed document for platform markers
fn detect_platform(document: &Html) -> PlatformMatch {
    if has_element(document, ".comment-form-comment") && has_element(document, "#commentform") {
        return PlatformMatch::WordPress;
    }

    if let Ok(meta_selector) = Selector::parse(r#"meta[name="generator"]"#) {
        for meta in document.select(&meta_selector) {
            let content = meta.value().attr("content").unwrap_or("");
            if content.to_lowercase().contains(WIX_GENERATOR_MARKER) {
                return PlatformMatch::Wix {
                    generator: content.to_string(),
                };
            }
        }
    }

    PlatformMatch::None
}

fn has_element(document: &Html, selector: &str) -> bool {
    Selector::parse(selector)
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false)
}

/// Extracts the page title, falling back to the "no title" sentinel
fn extract_title(document: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}
