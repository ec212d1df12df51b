//! Live progress display
//!
//! Shows scanned/total URLs plus the per-category counts on one line. The
//! counts are read from the aggregator after each record, so the display may
//! briefly lag the store; the final snapshot is always exact.
//!
//! The reporter also serves as the log writer: each log line is written to
//! stderr with the bar suspended, so log output and the bar never share a line.

use crate::results::CategoryCounts;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Redraw interval so the elapsed clock keeps moving between completions
const TICK_INTERVAL: Duration = Duration::from_millis(100);

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {bar:30.green/white} {pos}/{len} urls ({per_sec}) {msg}";

/// Progress line driven by the scan coordinator
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Creates a visible progress bar for `total` URLs
    pub fn new(total: u64) -> Self {
        let reporter = Self::hidden(total);
        reporter.show(total);
        reporter
    }

    /// Creates a reporter that tracks position but draws nothing
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden());
        Self { bar }
    }

    /// Starts drawing the bar on stderr for `total` URLs
    pub fn show(&self, total: u64) {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        self.bar.set_style(style);
        self.bar.set_length(total);
        self.bar.set_message(CategoryCounts::default().to_string());
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(TICK_INTERVAL);
    }

    /// Sets the number of URLs the bar counts up to
    pub fn set_length(&self, total: u64) {
        self.bar.set_length(total);
    }

    /// Advances by one recorded URL and refreshes the counts
    pub fn record(&self, counts: &CategoryCounts) {
        self.bar.set_message(counts.to_string());
        self.bar.inc(1);
    }

    /// Advances by one URL that was skipped as a duplicate
    pub fn skip(&self) {
        self.bar.inc(1);
    }

    /// URLs processed so far, recorded or skipped
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Stops the ticker and leaves the final line on screen
    ///
    /// The position is left where the scan got to. An interrupted scan
    /// therefore does not show as complete.
    pub fn finish(&self) {
        self.bar.abandon();
    }
}

/// Stderr writer that hides the progress bar while it writes
pub struct SuspendedStderr {
    bar: ProgressBar,
}

impl Write for SuspendedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bar.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressReporter {
    type Writer = SuspendedStderr;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedStderr {
            bar: self.bar.clone(),
        }
    }
}
