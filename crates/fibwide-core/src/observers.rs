//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::constants::PROGRESS_REPORT_THRESHOLD;
use crate::observer::{FrozenObserver, ProgressObserver};
use crate::progress::ProgressUpdate;

/// Observer that logs progress, at most once per `min_interval_ms`.
pub struct LoggingObserver {
    started: Instant,
    min_interval_ms: u64,
    /// Milliseconds since `started` of the last log line, offset by one so
    /// that zero means "never".
    last_logged: AtomicU64,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            started: Instant::now(),
            min_interval_ms,
            last_logged: AtomicU64::new(0),
        }
    }

    /// Claims the current log slot. Rayon workers share one observer, so
    /// the slot is taken with a compare-exchange and `last` may be newer
    /// than `now`.
    #[allow(clippy::cast_possible_truncation)]
    fn throttled(&self) -> bool {
        let now = self.started.elapsed().as_millis() as u64 + 1;
        let last = self.last_logged.load(Ordering::Relaxed);
        if last != 0 && now.saturating_sub(last) < self.min_interval_ms {
            return true;
        }
        self.last_logged
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
    }
}

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.done {
            info!(algorithm = update.algorithm, "calculation complete");
            return;
        }
        if self.throttled() {
            return;
        }
        debug!(
            algorithm = update.algorithm,
            progress = format!("{:.1}%", update.progress * 100.0),
            step = update.current_step,
            total = update.total_steps,
            "progress"
        );
    }

    fn freeze(&self) -> FrozenObserver {
        FrozenObserver::new(PROGRESS_REPORT_THRESHOLD)
    }
}

/// Discards every update.
pub struct NoOpObserver;

impl NoOpObserver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}

    fn freeze(&self) -> FrozenObserver {
        FrozenObserver::new(1.0)
    }
}
