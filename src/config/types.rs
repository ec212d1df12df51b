use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// File the user-agent list is read from when nothing else is configured
pub const DEFAULT_USER_AGENTS_FILE: &str = "user-agents.txt";

/// Main configuration structure for Sumi-Sieve
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scan engine behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScanConfig {
    /// Maximum number of fetches in flight at once
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of redirects followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl ScanConfig {
    /// Returns the per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            timeout_seconds: default_timeout_seconds(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Input list configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputConfig {
    /// Newline-delimited list of user agents to rotate through
    #[serde(default = "default_user_agents_file")]
    pub user_agents_file: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            user_agents_file: default_user_agents_file(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Single combined results file; when absent results are split per category
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Directory the per-category files are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            output_dir: default_output_dir(),
        }
    }
}

fn default_concurrency_limit() -> usize {
    10
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agents_file() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_USER_AGENTS_FILE))
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
