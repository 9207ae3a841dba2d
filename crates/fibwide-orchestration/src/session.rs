//! Exclusive compute session.
//!
//! A [`Device`] admits one [`Session`] at a time. A session answers
//! explicit [`Request`]s: compute F(n) with all three algorithms, or read
//! back how long one algorithm took on the last compute.

use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use fibwide_core::calculator::FibError;
use fibwide_core::constants::MAX_OFFSET;
use fibwide_core::engine::{render, Algorithm};
use fibwide_core::options::Options;
use fibwide_core::progress::CancellationToken;

use crate::interfaces::ComparisonReport;
use crate::orchestrator::compute_and_compare;

/// A request to an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Compute F(n). `n` is clamped to `MAX_OFFSET`.
    Compute { n: u64 },
    /// Elapsed time of `algorithm` during the last compute.
    Timing { algorithm: Algorithm },
}

/// Answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Value {
        /// Index actually computed, after clamping.
        n: u64,
        digits: String,
        /// Whether all three algorithms produced the same value.
        agreed: bool,
    },
    /// `None` before the first compute or if the algorithm failed.
    Elapsed(Option<Duration>),
}

struct DeviceState<const N: usize> {
    last: Option<ComparisonReport<N>>,
}

/// Single-holder compute device for `N`-word integers.
pub struct Device<const N: usize> {
    state: Mutex<DeviceState<N>>,
    opts: Options,
}

impl<const N: usize> Device<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DeviceState { last: None }),
            opts: Options::default(),
        }
    }

    /// Open a session.
    ///
    /// # Errors
    ///
    /// `FibError::Busy` while another session is open.
    pub fn open(&self) -> Result<Session<'_, N>, FibError> {
        let state = self.state.try_lock().ok_or(FibError::Busy)?;
        debug!(words = N, "session opened");
        Ok(Session {
            state,
            opts: &self.opts,
        })
    }
}

impl<const N: usize> Default for Device<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// An open session. The device is released when this is dropped.
pub struct Session<'a, const N: usize> {
    state: MutexGuard<'a, DeviceState<N>>,
    opts: &'a Options,
}

impl<const N: usize> Session<'_, N> {
    /// Serve one request.
    ///
    /// # Errors
    ///
    /// `FibError::Domain` when the clamped index still does not fit in `N`
    /// words, `FibError::Calculation` when no algorithm produced a value.
    pub fn handle(&mut self, request: Request) -> Result<Response, FibError> {
        match request {
            Request::Compute { n } => {
                let n = n.min(MAX_OFFSET);
                let report = compute_and_compare::<N>(n, self.opts, &CancellationToken::new())?;
                let value = report
                    .value()
                    .ok_or_else(|| FibError::Calculation("no algorithm produced a value".into()))?;
                let digits = render(value)?;
                let agreed = report.agreed();
                info!(n, agreed, "computed");
                self.state.last = Some(report);
                Ok(Response::Value { n, digits, agreed })
            }
            Request::Timing { algorithm } => {
                let elapsed = self.state.last.as_ref().and_then(|report| {
                    report
                        .result(algorithm)
                        .filter(|r| r.outcome.is_ok())
                        .map(|r| r.duration)
                });
                Ok(Response::Elapsed(elapsed))
            }
        }
    }
}

impl<const N: usize> Drop for Session<'_, N> {
    fn drop(&mut self) {
        debug!(words = N, "session closed");
    }
}
