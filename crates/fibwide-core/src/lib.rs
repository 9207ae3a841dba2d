//! # fibwide-core
//!
//! Fixed-width multi-word integers and three Fibonacci algorithms built on
//! them: linear iteration, matrix exponentiation and fast doubling.

pub mod bignum;
pub mod calculator;
pub mod constants;
pub mod engine;
pub mod fastdoubling;
pub mod linear;
pub mod matrix;
pub mod matrix_types;
pub mod observer;
pub mod observers;
pub mod options;
pub mod progress;
pub mod registry;

// Re-exports
pub use bignum::{ArithmeticError, FixedWidthInt, MulStrategy};
pub use calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
pub use constants::{exit_codes, DEFAULT_WORDS, MAX_OFFSET, PROGRESS_REPORT_THRESHOLD};
pub use engine::{compute, max_fib_index, render, Algorithm, FibSteps};
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::Options;
pub use progress::{CancellationToken, ProgressUpdate};
pub use registry::{CalculatorFactory, DefaultFactory};

/// The legacy 704-bit integer.
pub type FibInt = FixedWidthInt<DEFAULT_WORDS>;

/// Compute F(n) at the default width using fast doubling.
///
/// # Example
/// ```
/// assert_eq!(fibwide_core::fibonacci(10).unwrap().to_string(), "55");
/// assert_eq!(fibwide_core::fibonacci(0).unwrap().to_string(), "0");
/// assert!(fibwide_core::fibonacci(1016).is_err());
/// ```
///
/// # Errors
///
/// `FibError::Domain` for n past [`max_fib_index`] at 11 words (1015).
pub fn fibonacci(n: u64) -> Result<FibInt, FibError> {
    compute(Algorithm::FastDoubling, n)
}
