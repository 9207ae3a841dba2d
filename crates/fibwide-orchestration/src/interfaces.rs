//! Orchestration interfaces.

use std::time::Duration;

use fibwide_core::calculator::FibError;
use fibwide_core::engine::Algorithm;
use fibwide_core::FixedWidthInt;

/// Trait for presenting results to the user.
pub trait ResultPresenter<const N: usize>: Send + Sync {
    /// Present a calculation result.
    fn present_result(
        &self,
        algorithm: &str,
        n: u64,
        result: &FixedWidthInt<N>,
        duration: Duration,
        details: bool,
    );

    /// Present a comparison result.
    fn present_comparison(&self, results: &[CalculationResult<N>]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Result of a single calculation.
#[derive(Debug, Clone)]
pub struct CalculationResult<const N: usize> {
    /// Algorithm name.
    pub algorithm: String,
    /// The computed value or a structured error.
    pub outcome: Result<FixedWidthInt<N>, FibError>,
    /// Computation duration.
    pub duration: Duration,
}

impl<const N: usize> CalculationResult<N> {
    /// Whether this result came from `algorithm`.
    #[must_use]
    pub fn is(&self, algorithm: Algorithm) -> bool {
        self.algorithm == algorithm.name()
    }
}

/// Every algorithm's answer for one index, with timings.
#[derive(Debug, Clone)]
pub struct ComparisonReport<const N: usize> {
    pub n: u64,
    pub results: Vec<CalculationResult<N>>,
}

impl<const N: usize> ComparisonReport<N> {
    /// Result of one algorithm, if it ran.
    #[must_use]
    pub fn result(&self, algorithm: Algorithm) -> Option<&CalculationResult<N>> {
        self.results.iter().find(|r| r.is(algorithm))
    }

    /// Elapsed time of one algorithm, if it ran.
    #[must_use]
    pub fn elapsed(&self, algorithm: Algorithm) -> Option<Duration> {
        self.result(algorithm).map(|r| r.duration)
    }

    /// The value to report: fast doubling's when it succeeded, otherwise the
    /// first successful result.
    #[must_use]
    pub fn value(&self) -> Option<&FixedWidthInt<N>> {
        self.result(Algorithm::FastDoubling)
            .and_then(|r| r.outcome.as_ref().ok())
            .or_else(|| self.results.iter().find_map(|r| r.outcome.as_ref().ok()))
    }

    /// Whether every successful result holds the same value.
    #[must_use]
    pub fn agreed(&self) -> bool {
        let mut values = self.results.iter().filter_map(|r| r.outcome.as_ref().ok());
        match values.next() {
            Some(first) => values.all(|v| v == first),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type W2 = FixedWidthInt<2>;

    fn result(algorithm: Algorithm, value: u64, ms: u64) -> CalculationResult<2> {
        CalculationResult {
            algorithm: algorithm.name().into(),
            outcome: Ok(W2::from_u64(value)),
            duration: Duration::from_millis(ms),
        }
    }

    #[test]
    fn calculation_result() {
        let r = result(Algorithm::FastDoubling, 55, 100);
        assert!(r.is(Algorithm::FastDoubling));
        assert!(!r.is(Algorithm::Linear));
        assert!(r.outcome.is_ok());
    }

    #[test]
    fn report_lookup() {
        let report = ComparisonReport {
            n: 10,
            results: vec![
                result(Algorithm::Linear, 55, 3),
                result(Algorithm::FastDoubling, 55, 1),
            ],
        };
        assert_eq!(report.elapsed(Algorithm::Linear), Some(Duration::from_millis(3)));
        assert_eq!(report.elapsed(Algorithm::Matrix), None);
        assert_eq!(report.value(), Some(&W2::from_u64(55)));
        assert!(report.agreed());
    }

    #[test]
    fn fast_doubling_is_authoritative() {
        let report = ComparisonReport {
            n: 10,
            results: vec![
                result(Algorithm::Linear, 54, 3),
                result(Algorithm::FastDoubling, 55, 1),
            ],
        };
        assert!(!report.agreed());
        assert_eq!(report.value(), Some(&W2::from_u64(55)));
    }

    #[test]
    fn value_falls_back_when_fast_doubling_failed() {
        let report = ComparisonReport {
            n: 10,
            results: vec![
                result(Algorithm::Matrix, 55, 2),
                CalculationResult {
                    algorithm: Algorithm::FastDoubling.name().into(),
                    outcome: Err(FibError::Cancelled),
                    duration: Duration::ZERO,
                },
            ],
        };
        assert_eq!(report.value(), Some(&W2::from_u64(55)));
        assert!(report.agreed());
    }

    #[test]
    fn empty_report_has_no_value() {
        let report = ComparisonReport::<2> {
            n: 0,
            results: Vec::new(),
        };
        assert!(report.value().is_none());
        assert!(!report.agreed());
    }
}
