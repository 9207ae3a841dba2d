//! Calculator traits and the `FibCalculator` decorator.
//!
//! `Calculator` is the public trait consumed by orchestration.
//! `CoreCalculator` is the internal trait implemented by algorithms.
//! `FibCalculator` is a decorator that adds the width guard and the
//! cancellation pre-check. Every index goes through the wrapped algorithm,
//! however small, so timings and cross-checks always measure real work.

use std::sync::Arc;

use tracing::debug;

use crate::bignum::{ArithmeticError, FixedWidthInt};
use crate::engine::{max_fib_index, Algorithm};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::CancellationToken;

/// Error type for Fibonacci calculations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FibError {
    /// A calculation error occurred.
    #[error("calculation error: {0}")]
    Calculation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Calculation was cancelled.
    #[error("calculation cancelled")]
    Cancelled,

    /// Calculation timed out.
    #[error("calculation timed out after {0}")]
    Timeout(String),

    /// Results from different algorithms don't match.
    #[error("result mismatch between algorithms")]
    Mismatch,

    /// F(n) does not fit the configured width.
    #[error("F({n}) exceeds the fixed width (largest supported index is {max})")]
    Domain { n: u64, max: u64 },

    /// Another session holds the device.
    #[error("device is busy")]
    Busy,

    /// Word-level arithmetic failure.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Public trait for Fibonacci calculators, consumed by orchestration.
pub trait Calculator<const N: usize>: Send + Sync {
    /// Calculate F(n) with the given options.
    fn calculate(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<FixedWidthInt<N>, FibError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;
}

/// Internal trait for algorithm implementations.
/// Wrapped by `FibCalculator` which adds the width guard.
pub trait CoreCalculator<const N: usize>: Send + Sync {
    /// Perform the core calculation.
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<FixedWidthInt<N>, FibError>;

    /// Which algorithm this is.
    fn algorithm(&self) -> Algorithm;

    /// Get the name of this algorithm.
    fn name(&self) -> &'static str {
        self.algorithm().name()
    }
}

/// Decorator that wraps a `CoreCalculator` with the width guard.
pub struct FibCalculator<const N: usize> {
    inner: Arc<dyn CoreCalculator<N>>,
    max_index: u64,
}

impl<const N: usize> FibCalculator<N> {
    /// Create a new `FibCalculator` wrapping the given core calculator.
    #[must_use]
    pub fn new(inner: Arc<dyn CoreCalculator<N>>) -> Self {
        Self {
            inner,
            max_index: max_fib_index::<N>(),
        }
    }

    /// Largest index this calculator accepts.
    #[must_use]
    pub fn max_index(&self) -> u64 {
        self.max_index
    }
}

impl<const N: usize> Calculator<N> for FibCalculator<N> {
    fn calculate(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<FixedWidthInt<N>, FibError> {
        if n > self.max_index {
            return Err(FibError::Domain {
                n,
                max: self.max_index,
            });
        }

        cancel.check_cancelled()?;

        debug!(algorithm = self.inner.name(), n, words = N, "starting calculation");
        self.inner
            .calculate_core(cancel, observer, calc_index, n, opts)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastdoubling::FastDoubling;
    use crate::observers::NoOpObserver;

    type Fib11 = FibCalculator<11>;

    fn calculator() -> Fib11 {
        FibCalculator::new(Arc::new(FastDoubling::new()))
    }

    /// Answers 42 for every index.
    struct Constant;

    impl CoreCalculator<11> for Constant {
        fn calculate_core(
            &self,
            _cancel: &CancellationToken,
            _observer: &dyn ProgressObserver,
            _calc_index: usize,
            _n: u64,
            _opts: &Options,
        ) -> Result<FixedWidthInt<11>, FibError> {
            Ok(FixedWidthInt::from_u64(42))
        }

        fn algorithm(&self) -> Algorithm {
            Algorithm::Linear
        }
    }

    #[test]
    fn small_indices_reach_the_algorithm() {
        let calc = Fib11::new(Arc::new(Constant));
        for n in [0, 1, 2, 50, 93] {
            let value = calc
                .calculate(&CancellationToken::new(), &NoOpObserver::new(), 0, n, &Options::default())
                .unwrap();
            assert_eq!(value, FixedWidthInt::from_u64(42), "n={n}");
        }
    }

    #[test]
    fn small_indices_are_exact() {
        let calc = calculator();
        let value = calc
            .calculate(&CancellationToken::new(), &NoOpObserver::new(), 0, 93, &Options::default())
            .unwrap();
        assert_eq!(value, FixedWidthInt::from_u64(12_200_160_415_121_876_738));
    }

    #[test]
    fn rejects_index_past_width() {
        let calc = calculator();
        assert_eq!(calc.max_index(), 1015);
        let err = calc
            .calculate(
                &CancellationToken::new(),
                &NoOpObserver::new(),
                0,
                1016,
                &Options::default(),
            )
            .unwrap_err();
        assert_eq!(err, FibError::Domain { n: 1016, max: 1015 });
    }

    #[test]
    fn cancelled_before_start() {
        let calc = calculator();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = calc.calculate(&cancel, &NoOpObserver::new(), 0, 10, &Options::default());
        assert_eq!(result, Err(FibError::Cancelled));
    }

    #[test]
    fn fib_error_display() {
        let err = FibError::Calculation("test".into());
        assert_eq!(err.to_string(), "calculation error: test");

        let err = FibError::Cancelled;
        assert_eq!(err.to_string(), "calculation cancelled");

        let err = FibError::Domain { n: 2000, max: 1015 };
        assert_eq!(
            err.to_string(),
            "F(2000) exceeds the fixed width (largest supported index is 1015)"
        );

        let err: FibError = ArithmeticError::Underflow.into();
        assert_eq!(
            err.to_string(),
            "subtraction underflow: minuend is smaller than subtrahend"
        );
    }
}
