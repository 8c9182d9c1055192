//! Terminal progress bar for pipeline runs.

use cleanser_pipeline::{ChunkOutcome, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "Processing chunks [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// [`ProgressSink`] backed by an `indicatif` bar
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Create a hidden bar; it is sized and drawn on `start`
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn start(&self, total_chunks: usize) {
        self.bar.set_length(total_chunks as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, outcome: &ChunkOutcome) {
        if outcome.is_failure() {
            self.bar
                .set_message(format!("chunk {} {}", outcome.index, outcome.kind.label()));
        }
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}
