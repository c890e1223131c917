//! Query progress display shared with the log output

use crate::algorithm::executor::QueryReport;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

static QUERY_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Queries: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates the query progress bar
///
/// Safe to update from worker threads; the bar and the feasible counter are
/// both shared.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    bar: Option<ProgressBar>,
    feasible: AtomicUsize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            bar: None,
            feasible: AtomicUsize::new(0),
        }
    }

    /// Handle for printing lines above the bar
    pub const fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }

    /// Create the bar for `query_count` queries
    pub fn initialize(&mut self, query_count: usize) {
        let bar = ProgressBar::new(query_count as u64);
        bar.set_style(QUERY_STYLE.clone());
        self.feasible.store(0, Ordering::Relaxed);
        self.bar = Some(self.multi_progress.add(bar));
    }

    /// Record a finished query
    pub fn complete_query(&self, report: &QueryReport) {
        let feasible = if report.is_feasible() {
            self.feasible.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            self.feasible.load(Ordering::Relaxed)
        };

        if let Some(ref bar) = self.bar {
            bar.inc(1);
            bar.set_message(format!("{feasible} feasible"));
        }
    }

    /// Number of feasible queries recorded so far
    pub fn feasible(&self) -> usize {
        self.feasible.load(Ordering::Relaxed)
    }

    /// Clean up the progress display
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }
}
