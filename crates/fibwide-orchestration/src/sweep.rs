//! Timing sweep: every algorithm for every index in `0..=max_n`.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use fibwide_core::bignum::MulStrategy;
use fibwide_core::calculator::FibError;
use fibwide_core::engine::{check_domain, compute_unchecked, Algorithm};
use fibwide_core::progress::CancellationToken;
use fibwide_core::FixedWidthInt;

/// Timings for one index.
///
/// Displays as `"n linear matrix fast_doubling"` with nanosecond timings,
/// one row per line, ready for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepRow {
    pub n: u64,
    #[serde(serialize_with = "nanos")]
    pub linear: Duration,
    #[serde(serialize_with = "nanos")]
    pub matrix: Duration,
    #[serde(serialize_with = "nanos")]
    pub fast_doubling: Duration,
    /// Whether the three values were identical.
    pub agreed: bool,
}

fn nanos<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}

impl SweepRow {
    #[must_use]
    pub fn elapsed(&self, algorithm: Algorithm) -> Duration {
        match algorithm {
            Algorithm::Linear => self.linear,
            Algorithm::Matrix => self.matrix,
            Algorithm::FastDoubling => self.fast_doubling,
        }
    }
}

impl fmt::Display for SweepRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.n,
            self.linear.as_nanos(),
            self.matrix.as_nanos(),
            self.fast_doubling.as_nanos()
        )
    }
}

fn timed<const N: usize>(
    algorithm: Algorithm,
    n: u64,
    strategy: MulStrategy,
) -> (FixedWidthInt<N>, Duration) {
    let start = Instant::now();
    let value = compute_unchecked::<N>(algorithm, black_box(n), strategy);
    (black_box(value), start.elapsed())
}

/// Time all three algorithms for each n in `0..=max_n`, in order.
///
/// `on_row` sees each row as soon as it is measured. Disagreements are
/// logged and flagged in the row, not treated as errors.
///
/// # Errors
///
/// `FibError::Domain` when `max_n` is past the width's ceiling,
/// `FibError::Cancelled` / `FibError::Timeout` from the token.
pub fn sweep<const N: usize>(
    max_n: u64,
    strategy: MulStrategy,
    cancel: &CancellationToken,
    mut on_row: impl FnMut(&SweepRow),
) -> Result<Vec<SweepRow>, FibError> {
    check_domain::<N>(max_n)?;
    debug!(max_n, words = N, strategy = strategy.name(), "starting sweep");

    let mut rows = Vec::with_capacity(usize::try_from(max_n).map_or(0, |m| m + 1));
    for n in 0..=max_n {
        cancel.check_cancelled()?;

        let (linear, t_linear) = timed::<N>(Algorithm::Linear, n, strategy);
        let (matrix, t_matrix) = timed::<N>(Algorithm::Matrix, n, strategy);
        let (fast, t_fast) = timed::<N>(Algorithm::FastDoubling, n, strategy);

        let agreed = linear == fast && matrix == fast;
        if !agreed {
            warn!(n, "algorithms disagree");
        }

        let row = SweepRow {
            n,
            linear: t_linear,
            matrix: t_matrix,
            fast_doubling: t_fast,
            agreed,
        };
        on_row(&row);
        rows.push(row);
    }
    Ok(rows)
}
