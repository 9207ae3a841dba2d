//! Algorithm selection and the step-machine framework shared by the
//! three Fibonacci algorithms.
//!
//! Each algorithm is a [`FibSteps`] state machine. Pure callers run it to
//! completion with [`run_steps`]; calculators go through [`drive_steps`],
//! which checks for cancellation and reports progress between steps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bignum::{FixedWidthInt, MulStrategy};
use crate::calculator::FibError;
use crate::fastdoubling::DoublingSteps;
use crate::linear::LinearSteps;
use crate::matrix::MatrixSteps;
use crate::observer::ProgressObserver;
use crate::progress::{CancellationToken, ProgressUpdate};

/// The three ways to compute F(n).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// O(n) additions.
    Linear,
    /// O(log n) 2x2 matrix products.
    Matrix,
    /// O(log n) doubling steps.
    FastDoubling,
}

impl Algorithm {
    /// All algorithms, slowest first.
    pub const ALL: [Algorithm; 3] = [Self::Linear, Self::Matrix, Self::FastDoubling];

    /// Display name used in reports and progress updates.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Matrix => "MatrixExponentiation",
            Self::FastDoubling => "FastDoubling",
        }
    }

    /// Short selector accepted on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Matrix => "matrix",
            Self::FastDoubling => "fast",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" | "iterative" => Ok(Self::Linear),
            "matrix" => Ok(Self::Matrix),
            "fast" | "fastdoubling" => Ok(Self::FastDoubling),
            _ => Err(FibError::Config(format!("unknown calculator: {s}"))),
        }
    }
}

/// A Fibonacci computation broken into resumable steps.
pub trait FibSteps<const N: usize> {
    /// Number of steps from a fresh state to the result.
    fn total_steps(&self) -> u64;

    /// Whether the result is ready.
    fn is_done(&self) -> bool;

    /// Perform one step. Does nothing once done.
    fn step(&mut self);

    /// Consume the machine and return F(n).
    fn finish(self) -> FixedWidthInt<N>;
}

/// Run a step machine to completion.
pub fn run_steps<const N: usize, S: FibSteps<N>>(mut steps: S) -> FixedWidthInt<N> {
    while !steps.is_done() {
        steps.step();
    }
    steps.finish()
}

/// Run a step machine with cancellation checkpoints and progress reports.
#[allow(clippy::cast_precision_loss)]
pub fn drive_steps<const N: usize, S: FibSteps<N>>(
    mut steps: S,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
    calc_index: usize,
    algorithm: Algorithm,
) -> Result<FixedWidthInt<N>, FibError> {
    let total = steps.total_steps();
    let mut gate = observer.freeze();
    let mut current = 0u64;

    while !steps.is_done() {
        cancel.check_cancelled()?;
        steps.step();
        current += 1;

        let progress = current as f64 / total as f64;
        if gate.advance(progress) {
            observer.on_progress(&ProgressUpdate::new(
                calc_index,
                algorithm.name(),
                progress,
                current,
                total,
            ));
        }
    }

    observer.on_progress(&ProgressUpdate::done(calc_index, algorithm.name()));
    Ok(steps.finish())
}

/// Compute F(n) mod 2^(64 * N) with the chosen algorithm and no guard.
#[must_use]
pub fn compute_unchecked<const N: usize>(
    algorithm: Algorithm,
    n: u64,
    strategy: MulStrategy,
) -> FixedWidthInt<N> {
    match algorithm {
        Algorithm::Linear => run_steps(LinearSteps::new(n)),
        Algorithm::Matrix => run_steps(MatrixSteps::new(n, strategy)),
        Algorithm::FastDoubling => run_steps(DoublingSteps::new(n, strategy)),
    }
}

/// Compute F(n) with the chosen algorithm.
///
/// # Example
/// ```
/// use fibwide_core::engine::{compute, Algorithm};
///
/// let f = compute::<11>(Algorithm::Matrix, 100).unwrap();
/// assert_eq!(f.to_string(), "354224848179261915075");
/// assert!(compute::<11>(Algorithm::Linear, 5000).is_err());
/// ```
///
/// # Errors
///
/// `FibError::Domain` when F(n) does not fit in `N` words.
pub fn compute<const N: usize>(
    algorithm: Algorithm,
    n: u64,
) -> Result<FixedWidthInt<N>, FibError> {
    check_domain::<N>(n)?;
    Ok(compute_unchecked(algorithm, n, MulStrategy::default()))
}

/// Render a value as decimal digits.
///
/// # Errors
///
/// `FibError::Arithmetic` when the digit buffer cannot be allocated.
pub fn render<const N: usize>(value: &FixedWidthInt<N>) -> Result<String, FibError> {
    Ok(value.to_decimal_string()?)
}

/// Largest n such that F(n) fits in `N` words (93 for one word, 1015 for 11).
#[must_use]
pub fn max_fib_index<const N: usize>() -> u64 {
    let mut fk = FixedWidthInt::<N>::zero();
    let mut fk1 = FixedWidthInt::<N>::one();
    let mut n = 0;
    loop {
        let (next, overflow) = fk.overflowing_add(&fk1);
        if overflow {
            return n + 1;
        }
        fk = fk1;
        fk1 = next;
        n += 1;
    }
}

/// # Errors
///
/// `FibError::Domain` when `n > max_fib_index::<N>()`.
pub fn check_domain<const N: usize>(n: u64) -> Result<(), FibError> {
    let max = max_fib_index::<N>();
    if n > max {
        return Err(FibError::Domain { n, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_index_per_width() {
        assert_eq!(max_fib_index::<1>(), 93);
        assert_eq!(max_fib_index::<11>(), 1015);
        assert_eq!(max_fib_index::<32>(), 2951);
    }

    #[test]
    fn domain_guard() {
        assert!(check_domain::<11>(1015).is_ok());
        assert_eq!(
            check_domain::<11>(1016),
            Err(FibError::Domain { n: 1016, max: 1015 })
        );
        assert_eq!(
            compute::<1>(Algorithm::FastDoubling, 94),
            Err(FibError::Domain { n: 94, max: 93 })
        );
    }

    #[test]
    fn compute_known_values_all_algorithms() {
        for algo in Algorithm::ALL {
            for (n, expected) in [(0, 0), (1, 1), (2, 1), (10, 55), (20, 6765)] {
                let f = compute::<11>(algo, n).unwrap();
                assert_eq!(f.to_u64(), Some(expected), "{algo} F({n})");
            }
        }
    }

    #[test]
    fn compute_at_width_ceiling() {
        let fd = compute::<11>(Algorithm::FastDoubling, 1015).unwrap();
        let mx = compute::<11>(Algorithm::Matrix, 1015).unwrap();
        let li = compute::<11>(Algorithm::Linear, 1015).unwrap();
        assert_eq!(fd, mx);
        assert_eq!(fd, li);
        assert!(fd.bits() <= FixedWidthInt::<11>::BITS);
    }

    #[test]
    fn render_value() {
        let f = compute::<11>(Algorithm::FastDoubling, 100).unwrap();
        assert_eq!(render(&f).unwrap(), "354224848179261915075");
    }

    #[test]
    fn algorithm_names_and_parsing() {
        assert_eq!("fast".parse::<Algorithm>().unwrap(), Algorithm::FastDoubling);
        assert_eq!("matrix".parse::<Algorithm>().unwrap(), Algorithm::Matrix);
        assert_eq!("linear".parse::<Algorithm>().unwrap(), Algorithm::Linear);
        assert!("fft".parse::<Algorithm>().is_err());
        for algo in Algorithm::ALL {
            assert_eq!(algo.key().parse::<Algorithm>().unwrap(), algo);
        }
        assert_eq!(Algorithm::Matrix.to_string(), "MatrixExponentiation");
    }

    #[test]
    fn drive_reports_done() {
        use crate::observer::FrozenObserver;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(AtomicUsize);
        impl ProgressObserver for Counting {
            fn on_progress(&self, update: &ProgressUpdate) {
                if update.done {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
            fn freeze(&self) -> FrozenObserver {
                FrozenObserver::new(0.0)
            }
        }

        let observer = Counting(AtomicUsize::new(0));
        let f = drive_steps(
            LinearSteps::<4>::new(30),
            &CancellationToken::new(),
            &observer,
            0,
            Algorithm::Linear,
        )
        .unwrap();
        assert_eq!(f.to_u64(), Some(832_040));
        assert_eq!(observer.0.load(Ordering::Relaxed), 1);
    }
}
