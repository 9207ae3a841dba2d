//! Progress bar for timing sweeps.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use fibwide_orchestration::SweepRow;

use crate::output::format_duration;

const TEMPLATE: &str = "[{elapsed_precise} (ETA: {eta_precise})] {bar:40} {pos}/{len} {msg}";

/// Sweep progress on stderr. Hidden in quiet mode.
pub struct SweepProgress {
    bar: ProgressBar,
    mismatches: u64,
}

impl SweepProgress {
    /// A bar for indices `0..=max_n`.
    #[must_use]
    pub fn new(max_n: u64, quiet: bool) -> Self {
        let len = max_n.saturating_add(1);
        let bar = if quiet {
            ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new(len)
        };
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style);
        }
        Self { bar, mismatches: 0 }
    }

    /// Record one measured row.
    pub fn on_row(&mut self, row: &SweepRow) {
        if !row.agreed {
            self.mismatches += 1;
        }
        self.bar.set_message(format!(
            "n={} fast={}",
            row.n,
            format_duration(row.fast_doubling)
        ));
        self.bar.inc(1);
    }

    /// Rows whose algorithms disagreed so far.
    #[must_use]
    pub fn mismatches(&self) -> u64 {
        self.mismatches
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar from the terminal.
    pub fn finish(&self) {
        debug!(rows = self.bar.position(), mismatches = self.mismatches, "sweep finished");
        self.bar.finish_and_clear();
    }
}
