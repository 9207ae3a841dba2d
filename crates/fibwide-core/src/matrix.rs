//! Matrix Exponentiation algorithm for Fibonacci computation.
//!
//! Computes F(n) via Q^n where Q = [[1,1],[1,0]], by binary exponentiation
//! from the least significant bit of n. A vector `f = [F(m+1), F(m)]`
//! starts at `[1, 0]` and absorbs `Q^(2^i)` for every set bit `i`.

use crate::bignum::{FixedWidthInt, MulStrategy};
use crate::calculator::{CoreCalculator, FibError};
use crate::engine::{drive_steps, run_steps, Algorithm, FibSteps};
use crate::matrix_types::Matrix;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::CancellationToken;

/// Step machine for square-and-multiply. One step consumes one bit of n.
#[derive(Debug, Clone)]
pub struct MatrixSteps<const N: usize> {
    base: Matrix<N>,
    f: [FixedWidthInt<N>; 2],
    bits_left: u64,
    total: u64,
    strategy: MulStrategy,
}

impl<const N: usize> MatrixSteps<N> {
    #[must_use]
    pub fn new(n: u64, strategy: MulStrategy) -> Self {
        Self {
            base: Matrix::fibonacci_q(),
            f: [FixedWidthInt::one(), FixedWidthInt::zero()],
            bits_left: n,
            total: u64::from(u64::BITS - n.leading_zeros()),
            strategy,
        }
    }
}

impl<const N: usize> FibSteps<N> for MatrixSteps<N> {
    fn total_steps(&self) -> u64 {
        self.total
    }

    fn is_done(&self) -> bool {
        self.bits_left == 0
    }

    fn step(&mut self) {
        if self.bits_left == 0 {
            return;
        }
        if self.bits_left & 1 == 1 {
            self.f = self.base.apply(&self.f, self.strategy);
        }
        self.bits_left >>= 1;
        // The last square would never be used.
        if self.bits_left != 0 {
            self.base = self.base.square(self.strategy);
        }
    }

    fn finish(self) -> FixedWidthInt<N> {
        self.f[1]
    }
}

/// F(n) mod 2^(64 * N) by matrix exponentiation.
#[must_use]
pub fn fib_matrix<const N: usize>(n: u64, strategy: MulStrategy) -> FixedWidthInt<N> {
    run_steps(MatrixSteps::new(n, strategy))
}

/// Matrix Exponentiation calculator.
///
/// # Example
/// ```
/// use fibwide_core::calculator::CoreCalculator;
/// use fibwide_core::matrix::MatrixExponentiation;
/// use fibwide_core::observers::NoOpObserver;
/// use fibwide_core::options::Options;
/// use fibwide_core::progress::CancellationToken;
/// use fibwide_core::FixedWidthInt;
///
/// let calc = MatrixExponentiation::new();
/// let result: FixedWidthInt<11> = calc
///     .calculate_core(&CancellationToken::new(), &NoOpObserver::new(), 0, 100, &Options::default())
///     .unwrap();
/// assert_eq!(result.to_string(), "354224848179261915075");
/// ```
pub struct MatrixExponentiation;

impl MatrixExponentiation {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for MatrixExponentiation {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CoreCalculator<N> for MatrixExponentiation {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<FixedWidthInt<N>, FibError> {
        drive_steps(
            MatrixSteps::new(n, opts.mul_strategy),
            cancel,
            observer,
            calc_index,
            Algorithm::Matrix,
        )
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Matrix
    }
}
