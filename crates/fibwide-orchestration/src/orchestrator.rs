//! Core orchestration: parallel execution and result analysis.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::iter::{IntoParallelRefIterator, IndexedParallelIterator, ParallelIterator};
use tracing::{debug, warn};

use fibwide_core::calculator::{Calculator, FibError};
use fibwide_core::engine::check_domain;
use fibwide_core::observer::ProgressObserver;
use fibwide_core::observers::NoOpObserver;
use fibwide_core::options::Options;
use fibwide_core::progress::CancellationToken;
use fibwide_core::registry::DefaultFactory;

use crate::calculator_selection::get_calculators_to_run;
use crate::interfaces::{CalculationResult, ComparisonReport};

/// Execute calculations with all given calculators.
pub fn execute_calculations<const N: usize>(
    calculators: &[Arc<dyn Calculator<N>>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Vec<CalculationResult<N>> {
    execute_calculations_with_observer(calculators, n, opts, cancel, timeout, &NoOpObserver::new())
}

/// Execute calculations with all given calculators and a progress observer.
///
/// Several calculators run in parallel on the rayon pool. Results keep the
/// order of `calculators`. With a timeout, every calculator shares one
/// deadline and reports `FibError::Timeout` once it passes.
pub fn execute_calculations_with_observer<const N: usize>(
    calculators: &[Arc<dyn Calculator<N>>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
    observer: &dyn ProgressObserver,
) -> Vec<CalculationResult<N>> {
    let token = deadline_token(cancel, timeout);

    if let [calc] = calculators {
        return vec![run_one(calc, 0, n, opts, &token, observer)];
    }

    calculators
        .par_iter()
        .enumerate()
        .map(|(i, calc)| run_one(calc, i, n, opts, &token, observer))
        .collect()
}

/// Execute calculations one after another on the calling thread.
///
/// Used when the caller has pinned its thread to a CPU: nothing leaves that
/// thread, so every timing is taken on the pinned core.
pub fn execute_calculations_in_order<const N: usize>(
    calculators: &[Arc<dyn Calculator<N>>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
    observer: &dyn ProgressObserver,
) -> Vec<CalculationResult<N>> {
    let token = deadline_token(cancel, timeout);
    calculators
        .iter()
        .enumerate()
        .map(|(i, calc)| run_one(calc, i, n, opts, &token, observer))
        .collect()
}

fn deadline_token(cancel: &CancellationToken, timeout: Option<Duration>) -> CancellationToken {
    match timeout {
        Some(timeout) => cancel.with_timeout(timeout),
        None => cancel.clone(),
    }
}

fn run_one<const N: usize>(
    calc: &Arc<dyn Calculator<N>>,
    index: usize,
    n: u64,
    opts: &Options,
    token: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> CalculationResult<N> {
    let start = Instant::now();
    let outcome = calc.calculate(token, observer, index, n, opts);
    let duration = start.elapsed();
    debug!(algorithm = calc.name(), n, ?duration, ok = outcome.is_ok(), "calculation finished");
    CalculationResult {
        algorithm: calc.name().to_string(),
        outcome,
        duration,
    }
}

/// Analyze comparison results for mismatches.
///
/// # Errors
///
/// `FibError::Calculation` when no calculator succeeded,
/// `FibError::Mismatch` when two successful results differ.
pub fn analyze_comparison_results<const N: usize>(
    results: &[CalculationResult<N>],
) -> Result<(), FibError> {
    let mut valid = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|v| (r.algorithm.as_str(), v)));

    let Some((first_algo, first_value)) = valid.next() else {
        return Err(FibError::Calculation("no valid results".into()));
    };

    for (algo, value) in valid {
        if value != first_value {
            warn!(left = first_algo, right = algo, "result mismatch");
            return Err(FibError::Mismatch);
        }
    }

    Ok(())
}

/// Run all three algorithms for `n` and collect values and timings.
///
/// Mismatches are not an error here; inspect [`ComparisonReport::agreed`].
///
/// # Errors
///
/// `FibError::Domain` when F(n) does not fit in `N` words.
pub fn compute_and_compare<const N: usize>(
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
) -> Result<ComparisonReport<N>, FibError> {
    check_domain::<N>(n)?;
    let factory = DefaultFactory::<N>::new();
    let calculators = get_calculators_to_run("all", &factory)?;
    let results = execute_calculations(&calculators, n, opts, cancel, None);
    Ok(ComparisonReport { n, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibwide_core::calculator::FibCalculator;
    use fibwide_core::engine::Algorithm;
    use fibwide_core::fastdoubling::FastDoubling;
    use fibwide_core::linear::Linear;
    use fibwide_core::FixedWidthInt;

    type W11 = FixedWidthInt<11>;

    fn ok(algorithm: &str, value: u64) -> CalculationResult<11> {
        CalculationResult {
            algorithm: algorithm.into(),
            outcome: Ok(W11::from_u64(value)),
            duration: Duration::from_millis(1),
        }
    }

    fn failed(algorithm: &str, error: FibError) -> CalculationResult<11> {
        CalculationResult {
            algorithm: algorithm.into(),
            outcome: Err(error),
            duration: Duration::from_millis(1),
        }
    }

    #[test]
    fn execute_single_calculator() {
        let calc: Arc<dyn Calculator<11>> =
            Arc::new(FibCalculator::new(Arc::new(FastDoubling::new())));
        let results = execute_calculations(
            &[calc],
            100,
            &Options::default(),
            &CancellationToken::new(),
            None,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].outcome.as_ref().unwrap().to_string(),
            "354224848179261915075"
        );
    }

    #[test]
    fn execute_preserves_order() {
        let factory = DefaultFactory::<11>::new();
        let calcs = get_calculators_to_run("all", &factory).unwrap();
        let results = execute_calculations(
            &calcs,
            500,
            &Options::default(),
            &CancellationToken::new(),
            None,
        );
        let names: Vec<&str> = results.iter().map(|r| r.algorithm.as_str()).collect();
        assert_eq!(names, ["Linear", "MatrixExponentiation", "FastDoubling"]);
        assert!(analyze_comparison_results(&results).is_ok());
    }

    #[test]
    fn execute_with_expired_timeout() {
        let linear: Arc<dyn Calculator<11>> =
            Arc::new(FibCalculator::new(Arc::new(Linear::new())));
        let opts = Options::default();
        let results = execute_calculations(
            &[linear],
            1000,
            &opts,
            &CancellationToken::new(),
            Some(Duration::ZERO),
        );
        assert!(matches!(results[0].outcome, Err(FibError::Timeout(_))));
    }

    #[test]
    fn execute_cancelled() {
        let factory = DefaultFactory::<11>::new();
        let calcs = get_calculators_to_run("all", &factory).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let opts = Options::default();
        let results = execute_calculations(&calcs, 200, &opts, &cancel, None);
        assert!(results
            .iter()
            .all(|r| r.outcome == Err(FibError::Cancelled)));
    }

    /// Records the thread each calculation ran on.
    struct ThreadRecorder {
        seen: parking_lot::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl Calculator<11> for ThreadRecorder {
        fn calculate(
            &self,
            _cancel: &CancellationToken,
            _observer: &dyn ProgressObserver,
            _calc_index: usize,
            n: u64,
            _opts: &Options,
        ) -> Result<W11, FibError> {
            self.seen.lock().push(std::thread::current().id());
            Ok(W11::from_u64(n))
        }

        fn name(&self) -> &str {
            "Recorder"
        }
    }

    #[test]
    fn in_order_stays_on_calling_thread() {
        let recorder = Arc::new(ThreadRecorder {
            seen: parking_lot::Mutex::new(Vec::new()),
        });
        let calcs: Vec<Arc<dyn Calculator<11>>> = (0..4)
            .map(|_| -> Arc<dyn Calculator<11>> { recorder.clone() })
            .collect();
        let results = execute_calculations_in_order(
            &calcs,
            7,
            &Options::default(),
            &CancellationToken::new(),
            None,
            &NoOpObserver::new(),
        );
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.outcome == Ok(W11::from_u64(7))));
        let caller = std::thread::current().id();
        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|id| *id == caller));
    }

    #[test]
    fn in_order_matches_parallel() {
        let factory = DefaultFactory::<11>::new();
        let calcs = get_calculators_to_run("all", &factory).unwrap();
        let cancel = CancellationToken::new();
        let opts = Options::default();
        let ordered = execute_calculations_in_order(&calcs, 400, &opts, &cancel, None, &NoOpObserver::new());
        let parallel = execute_calculations(&calcs, 400, &opts, &cancel, None);
        let names = |rs: &[CalculationResult<11>]| rs.iter().map(|r| r.algorithm.clone()).collect::<Vec<_>>();
        assert_eq!(names(&ordered), names(&parallel));
        for (a, b) in ordered.iter().zip(&parallel) {
            assert_eq!(a.outcome, b.outcome);
        }
    }

    #[test]
    fn analyze_matching_results() {
        let results = vec![ok("A", 55), ok("B", 55), ok("C", 55)];
        assert!(analyze_comparison_results(&results).is_ok());
    }

    #[test]
    fn analyze_mismatching_results() {
        let results = vec![ok("A", 55), ok("B", 56)];
        assert_eq!(analyze_comparison_results(&results), Err(FibError::Mismatch));
    }

    #[test]
    fn analyze_no_valid_results() {
        let results = vec![failed("A", FibError::Cancelled)];
        assert!(matches!(
            analyze_comparison_results(&results),
            Err(FibError::Calculation(_))
        ));
        assert!(matches!(
            analyze_comparison_results::<11>(&[]),
            Err(FibError::Calculation(_))
        ));
    }

    #[test]
    fn analyze_ignores_error_entries() {
        let results = vec![
            ok("A", 55),
            failed("B", FibError::Timeout("deadline reached".into())),
            ok("C", 55),
        ];
        assert!(analyze_comparison_results(&results).is_ok());
    }

    #[test]
    fn compare_all_three() {
        let opts = Options::default();
        let report = compute_and_compare::<11>(300, &opts, &CancellationToken::new()).unwrap();
        assert_eq!(report.n, 300);
        assert_eq!(report.results.len(), 3);
        assert!(report.agreed());
        assert_eq!(
            report.value().unwrap().to_string(),
            "222232244629420445529739893461909967206666939096499764990979600"
        );
        for algo in Algorithm::ALL {
            assert!(report.elapsed(algo).is_some());
        }
    }

    #[test]
    fn compare_rejects_out_of_range() {
        let result = compute_and_compare::<1>(94, &Options::default(), &CancellationToken::new());
        assert_eq!(result.unwrap_err(), FibError::Domain { n: 94, max: 93 });
    }
}
