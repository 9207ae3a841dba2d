//! Progress observer trait and the per-run report gate.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::progress::ProgressUpdate;

/// Receives progress from running calculators.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, update: &ProgressUpdate);

    /// A gate for one step loop, tuned to how often this observer wants
    /// updates.
    fn freeze(&self) -> FrozenObserver;
}

/// Gate owned by a single step loop. Lets an update through once progress
/// has moved by at least `threshold` since the last one it let through.
#[derive(Debug, Clone, Copy)]
pub struct FrozenObserver {
    last: f64,
    threshold: f64,
}

impl FrozenObserver {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            last: 0.0,
            threshold,
        }
    }

    /// Whether `progress` should be reported. A `true` answer moves the gate.
    pub fn advance(&mut self, progress: f64) -> bool {
        if progress - self.last < self.threshold {
            return false;
        }
        self.last = progress;
        true
    }
}

/// Fans each update out to every registered observer.
#[derive(Default)]
pub struct ProgressSubject {
    observers: RwLock<Vec<Arc<dyn ProgressObserver>>>,
}

impl ProgressSubject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: Arc<dyn ProgressObserver>) {
        self.observers.write().push(observer);
    }
}

impl ProgressObserver for ProgressSubject {
    fn on_progress(&self, update: &ProgressUpdate) {
        for observer in self.observers.read().iter() {
            observer.on_progress(update);
        }
    }

    /// Reports as often as the most eager registered observer; with none
    /// registered only the end of the run gets through.
    fn freeze(&self) -> FrozenObserver {
        let threshold = self
            .observers
            .read()
            .iter()
            .map(|o| o.freeze().threshold)
            .fold(1.0, f64::min);
        FrozenObserver::new(threshold)
    }
}
