//! Fast Doubling algorithm for Fibonacci computation.
//!
//! Uses the doubling identities:
//!   F(2k)   = F(k) * (2*F(k+1) - F(k))
//!   F(2k+1) = F(k+1)^2 + F(k)^2
//!
//! Iterates from the most significant set bit of n down to bit 0. This is
//! the authoritative algorithm when results disagree.

use crate::bignum::{FixedWidthInt, MulStrategy};
use crate::calculator::{CoreCalculator, FibError};
use crate::engine::{drive_steps, run_steps, Algorithm, FibSteps};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::CancellationToken;

/// State for the doubling loop: `(F(k), F(k+1))` plus the bits still to read.
#[derive(Debug, Clone)]
pub struct DoublingSteps<const N: usize> {
    fk: FixedWidthInt<N>,
    fk1: FixedWidthInt<N>,
    n: u64,
    /// Bits of n not yet consumed, counted from the top.
    bit: u32,
    strategy: MulStrategy,
}

impl<const N: usize> DoublingSteps<N> {
    #[must_use]
    pub fn new(n: u64, strategy: MulStrategy) -> Self {
        Self {
            fk: FixedWidthInt::zero(),
            fk1: FixedWidthInt::one(),
            n,
            bit: u64::BITS - n.leading_zeros(),
            strategy,
        }
    }

    /// Current `(F(k), F(k+1))`.
    #[must_use]
    pub fn pair(&self) -> (&FixedWidthInt<N>, &FixedWidthInt<N>) {
        (&self.fk, &self.fk1)
    }
}

impl<const N: usize> FibSteps<N> for DoublingSteps<N> {
    fn total_steps(&self) -> u64 {
        u64::from(u64::BITS - self.n.leading_zeros())
    }

    fn is_done(&self) -> bool {
        self.bit == 0
    }

    fn step(&mut self) {
        if self.bit == 0 {
            return;
        }
        self.bit -= 1;

        // t = 2*F(k+1) - F(k); never negative since F(k+1) >= F(k).
        let t = (self.fk1 << 1).wrapping_sub(&self.fk);
        let f2k = self.fk.wrapping_mul(&t, self.strategy);
        let f2k1 = self
            .fk
            .wrapping_mul(&self.fk, self.strategy)
            .wrapping_add(&self.fk1.wrapping_mul(&self.fk1, self.strategy));

        if (self.n >> self.bit) & 1 == 1 {
            self.fk1 = f2k.wrapping_add(&f2k1);
            self.fk = f2k1;
        } else {
            self.fk = f2k;
            self.fk1 = f2k1;
        }
    }

    fn finish(self) -> FixedWidthInt<N> {
        self.fk
    }
}

/// F(n) mod 2^(64 * N) by fast doubling.
#[must_use]
pub fn fib_fast_doubling<const N: usize>(n: u64, strategy: MulStrategy) -> FixedWidthInt<N> {
    run_steps(DoublingSteps::new(n, strategy))
}

/// Fast Doubling calculator.
///
/// # Example
/// ```
/// use fibwide_core::fastdoubling::FastDoubling;
/// use fibwide_core::calculator::CoreCalculator;
/// use fibwide_core::observers::NoOpObserver;
/// use fibwide_core::options::Options;
/// use fibwide_core::progress::CancellationToken;
/// use fibwide_core::FixedWidthInt;
///
/// let calc = FastDoubling::new();
/// let cancel = CancellationToken::new();
/// let observer = NoOpObserver::new();
/// let opts = Options::default();
/// let result: FixedWidthInt<11> = calc.calculate_core(&cancel, &observer, 0, 100, &opts).unwrap();
/// assert_eq!(result.to_string(), "354224848179261915075");
/// ```
pub struct FastDoubling;

impl FastDoubling {
    /// Create a new `FastDoubling` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CoreCalculator<N> for FastDoubling {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<FixedWidthInt<N>, FibError> {
        drive_steps(
            DoublingSteps::new(n, opts.mul_strategy),
            cancel,
            observer,
            calc_index,
            Algorithm::FastDoubling,
        )
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::FastDoubling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::fib_linear;
    use crate::observers::NoOpObserver;

    type W11 = FixedWidthInt<11>;

    fn fd(n: u64) -> W11 {
        fib_fast_doubling(n, MulStrategy::SkipZeros)
    }

    #[test]
    fn fast_doubling_small() {
        assert!(fd(0).is_zero());
        assert_eq!(fd(1).to_u64(), Some(1));
        assert_eq!(fd(2).to_u64(), Some(1));
        assert_eq!(fd(10).to_u64(), Some(55));
        assert_eq!(fd(20).to_u64(), Some(6765));
        assert_eq!(fd(93).to_u64(), Some(12_200_160_415_121_876_738));
    }

    #[test]
    fn fast_doubling_f94_needs_two_words() {
        let f = fd(94);
        assert_eq!(f.significant_len(), 2);
        assert_eq!(f.to_string(), "19740274219868223167");
    }

    #[test]
    fn fast_doubling_f1000() {
        let s = fd(1000).to_string();
        assert_eq!(s.len(), 209);
        assert!(s.starts_with("43466557686937456435688527675040625802564"));
    }

    #[test]
    fn fast_doubling_matches_linear() {
        for n in (0..=300).step_by(7) {
            assert_eq!(fd(n), fib_linear(n), "mismatch at n={n}");
        }
    }

    #[test]
    fn pair_after_finish_is_consecutive() {
        let mut steps = DoublingSteps::<11>::new(50, MulStrategy::Naive);
        while !steps.is_done() {
            steps.step();
        }
        let (fk, fk1) = steps.pair();
        assert_eq!(*fk, fib_linear(50));
        assert_eq!(*fk1, fib_linear(51));
    }

    #[test]
    fn calculator_reports_progress() {
        use crate::observer::FrozenObserver;
        use crate::progress::ProgressUpdate;
        use parking_lot::Mutex;

        struct Recorder(Mutex<Vec<ProgressUpdate>>);
        impl ProgressObserver for Recorder {
            fn on_progress(&self, update: &ProgressUpdate) {
                self.0.lock().push(update.clone());
            }
            fn freeze(&self) -> FrozenObserver {
                FrozenObserver::new(0.0)
            }
        }

        let recorder = Recorder(Mutex::new(Vec::new()));
        let result: W11 = FastDoubling::new()
            .calculate_core(
                &CancellationToken::new(),
                &recorder,
                2,
                1000,
                &Options::default(),
            )
            .unwrap();
        assert_eq!(result, fd(1000));

        let updates = recorder.0.lock();
        // 10 bits, one update per bit, plus the completion update.
        assert_eq!(updates.len(), 11);
        assert!(updates.iter().all(|u| u.calc_index == 2));
        assert!(updates.last().is_some_and(|u| u.done));
        assert_eq!(updates[0].total_steps, 10);
    }

    #[test]
    fn cancellation_stops_loop() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result: Result<W11, _> = FastDoubling::new().calculate_core(
            &cancel,
            &NoOpObserver::new(),
            0,
            1000,
            &Options::default(),
        );
        assert_eq!(result, Err(FibError::Cancelled));
    }
}
