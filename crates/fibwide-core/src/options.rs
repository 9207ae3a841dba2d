//! Calculation options.

use crate::bignum::MulStrategy;

/// Options for one Fibonacci calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Multiplication strategy used by the matrix and doubling algorithms.
    pub mul_strategy: MulStrategy,
}

impl Options {
    #[must_use]
    pub fn with_strategy(mul_strategy: MulStrategy) -> Self {
        Self { mul_strategy }
    }
}
