//! Linear iteration: `(a, b) <- (b, a + b)`, one addition per index.
//!
//! The slowest algorithm and the baseline the other two are checked against.

use crate::bignum::FixedWidthInt;
use crate::calculator::{CoreCalculator, FibError};
use crate::engine::{drive_steps, run_steps, Algorithm, FibSteps};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::CancellationToken;

/// Step machine for the addition chain. One step is one addition.
#[derive(Debug, Clone)]
pub struct LinearSteps<const N: usize> {
    prev: FixedWidthInt<N>,
    curr: FixedWidthInt<N>,
    remaining: u64,
    total: u64,
}

impl<const N: usize> LinearSteps<N> {
    #[must_use]
    pub fn new(n: u64) -> Self {
        let total = n.saturating_sub(1);
        Self {
            prev: FixedWidthInt::zero(),
            curr: if n == 0 {
                FixedWidthInt::zero()
            } else {
                FixedWidthInt::one()
            },
            remaining: total,
            total,
        }
    }
}

impl<const N: usize> FibSteps<N> for LinearSteps<N> {
    fn total_steps(&self) -> u64 {
        self.total
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }

    fn step(&mut self) {
        if self.remaining == 0 {
            return;
        }
        let next = self.prev.wrapping_add(&self.curr);
        self.prev = std::mem::replace(&mut self.curr, next);
        self.remaining -= 1;
    }

    fn finish(self) -> FixedWidthInt<N> {
        self.curr
    }
}

/// F(n) mod 2^(64 * N) by repeated addition.
#[must_use]
pub fn fib_linear<const N: usize>(n: u64) -> FixedWidthInt<N> {
    run_steps(LinearSteps::new(n))
}

/// Linear iteration calculator.
pub struct Linear;

impl Linear {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Linear {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CoreCalculator<N> for Linear {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        _opts: &Options,
    ) -> Result<FixedWidthInt<N>, FibError> {
        drive_steps(
            LinearSteps::new(n),
            cancel,
            observer,
            calc_index,
            Algorithm::Linear,
        )
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Linear
    }
}
