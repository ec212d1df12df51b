//! Sumi-Sieve main entry point
//!
//! This is the command-line interface for the Sumi-Sieve site platform scanner.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use sumi_sieve::config::{load_config, validate, Config};
use sumi_sieve::output::{print_summary, write_results};
use sumi_sieve::scanner::{
    install_signal_handlers, ProgressReporter, ScanCoordinator, Shutdown, UserAgentPool,
};
use sumi_sieve::target::resolve_targets;
use sumi_sieve::ConfigError;
use tracing_subscriber::EnvFilter;

/// Sumi-Sieve: a concurrent site platform scanner
///
/// Sumi-Sieve fetches a list of sites concurrently and sorts them into Wix,
/// WordPress, protected, error and other-platform buckets based on the
/// HTTP status and markers in the returned HTML.
#[derive(Parser, Debug)]
#[command(name = "sumi-sieve")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent site platform scanner", long_about = None)]
struct Cli {
    /// URLs to scan (scheme optional)
    #[arg(short, long, num_args = 1.., value_name = "URL")]
    urls: Vec<String>,

    /// File with one URL per line
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Write all results to a single file instead of one file per category
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Maximum number of concurrent requests
    #[arg(short, long, value_name = "N")]
    concurrent: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum number of redirects to follow
    #[arg(long, value_name = "N")]
    max_redirects: Option<usize>,

    /// File with one user agent per line
    #[arg(long, value_name = "PATH")]
    user_agents: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log lines are written through the progress bar so they never tear it
    let progress = ProgressReporter::hidden(0);

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, progress.clone());

    let config = build_config(&cli)?;

    let targets = resolve_targets(&cli.urls, cli.file.as_deref());
    if targets.is_empty() {
        tracing::error!("No URLs to scan");
        return Err(ConfigError::NoTargets.into());
    }

    if !cli.quiet {
        print_banner(&config, targets.len());
    }

    let user_agents = match &config.input.user_agents_file {
        Some(path) => UserAgentPool::from_file(path),
        None => UserAgentPool::new(Vec::new()),
    };

    let (shutdown, listener) = Shutdown::new();
    install_signal_handlers(shutdown);

    if cli.quiet || cli.no_progress {
        progress.set_length(targets.len() as u64);
    } else {
        progress.show(targets.len() as u64);
    }

    let coordinator = ScanCoordinator::from_config(&config.scan, user_agents)
        .context("Failed to build HTTP client")?
        .with_progress(progress)
        .with_shutdown(listener);

    let start_time = Instant::now();
    let snapshot = coordinator.run(&targets).await;
    let elapsed = start_time.elapsed();

    print_summary(&snapshot, elapsed);

    if !snapshot.is_empty() || config.output.output_path.is_some() {
        let written = write_results(&snapshot, &config.output)
            .context("Failed to save results")?;
        for path in written {
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, progress: ProgressReporter) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sieve=info,warn"),
            1 => EnvFilter::new("sumi_sieve=debug,info"),
            2 => EnvFilter::new("sumi_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(progress)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(concurrent) = cli.concurrent {
        config.scan.concurrency_limit = concurrent;
    }
    if let Some(timeout) = cli.timeout {
        config.scan.timeout_seconds = timeout;
    }
    if let Some(max_redirects) = cli.max_redirects {
        config.scan.max_redirects = max_redirects;
    }
    if let Some(user_agents) = &cli.user_agents {
        config.input.user_agents_file = Some(user_agents.clone());
    }
    if let Some(output) = &cli.output {
        config.output.output_path = Some(output.clone());
    }

    validate(&config)?;
    Ok(config)
}

fn print_banner(config: &Config, target_count: usize) {
    println!("=== Sumi-Sieve {} ===", env!("CARGO_PKG_VERSION"));
    println!(
        "Started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Targets: {}", target_count);
    println!("  Concurrency: {}", config.scan.concurrency_limit);
    println!("  Timeout: {}s", config.scan.timeout_seconds);
    println!("  Max redirects: {}", config.scan.max_redirects);
    println!();
}
