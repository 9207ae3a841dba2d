//! Errors raised by fixed-width arithmetic.

/// Error type for word-level operations on [`FixedWidthInt`](super::FixedWidthInt).
///
/// `WordIndex` and `ShiftAmount` mean the caller broke an operation's
/// contract and are not meant to be retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    /// A word position at or beyond the configured width.
    #[error("word index {pos} out of range for a {width}-word integer")]
    WordIndex { pos: usize, width: usize },

    /// A single-step shift amount outside `0..64`.
    #[error("shift amount {0} out of range (must be below 64)")]
    ShiftAmount(u32),

    /// Checked subtraction with a minuend smaller than the subtrahend.
    #[error("subtraction underflow: minuend is smaller than subtrahend")]
    Underflow,

    /// Checked operation whose result does not fit the fixed width.
    #[error("result exceeds the fixed width")]
    Overflow,

    /// The decimal rendering buffer could not be allocated.
    #[error("decimal buffer allocation failed: {0}")]
    Allocation(String),

    /// Malformed decimal input.
    #[error("invalid decimal literal: {0}")]
    Parse(String),
}
