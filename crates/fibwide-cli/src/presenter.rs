//! CLI result presenter.

use std::time::Duration;

use fibwide_core::engine::render;
use fibwide_core::FixedWidthInt;
use fibwide_orchestration::interfaces::{CalculationResult, ResultPresenter};

use crate::output::{format_duration, format_number, format_result};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Lines printed for one result.
    #[must_use]
    pub fn result_lines<const N: usize>(
        &self,
        algorithm: &str,
        n: u64,
        result: &FixedWidthInt<N>,
        duration: Duration,
        details: bool,
    ) -> Vec<String> {
        let digits = match render(result) {
            Ok(digits) => digits,
            Err(e) => return vec![format!("Error: {e}")],
        };
        if self.quiet {
            return vec![digits];
        }

        let mut lines = vec![
            format!("Algorithm: {algorithm}"),
            format!("N: {}", format_number(n)),
            format!("Duration: {}", format_duration(duration)),
        ];
        if details {
            lines.push(format!("Width: {} bits ({N} words)", FixedWidthInt::<N>::BITS));
            lines.push(format!("Result bits: {}", result.bits()));
            lines.push(format!("Result words: {}", result.significant_len()));
            lines.push(format!("Result digits: {}", digits.len()));
        }
        lines.push(format!(
            "F({}) = {}",
            format_number(n),
            format_result(&digits, self.verbose)
        ));
        lines
    }

    /// Lines printed for a comparison table.
    #[must_use]
    pub fn comparison_lines<const N: usize>(&self, results: &[CalculationResult<N>]) -> Vec<String> {
        if self.quiet {
            return Vec::new();
        }
        let mut lines = vec![String::new(), "Comparison Results:".to_string(), "-".repeat(60)];
        for result in results {
            let status = match &result.outcome {
                Ok(_) => "OK".to_string(),
                Err(e) => format!("ERROR: {e}"),
            };
            lines.push(format!(
                "  {:<22} {:>10} [{}]",
                result.algorithm,
                format_duration(result.duration),
                status,
            ));
        }
        lines
    }
}

impl<const N: usize> ResultPresenter<N> for CLIResultPresenter {
    fn present_result(
        &self,
        algorithm: &str,
        n: u64,
        result: &FixedWidthInt<N>,
        duration: Duration,
        details: bool,
    ) {
        for line in self.result_lines(algorithm, n, result, duration, details) {
            println!("{line}");
        }
    }

    fn present_comparison(&self, results: &[CalculationResult<N>]) {
        for line in self.comparison_lines(results) {
            println!("{line}");
        }
    }

    fn present_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibwide_core::calculator::FibError;

    type W11 = FixedWidthInt<11>;

    #[test]
    fn quiet_prints_only_digits() {
        let presenter = CLIResultPresenter::new(false, true);
        let lines = presenter.result_lines("FastDoubling", 10, &W11::from_u64(55), Duration::from_millis(5), true);
        assert_eq!(lines, ["55"]);
    }

    #[test]
    fn normal_result() {
        let presenter = CLIResultPresenter::new(false, false);
        let lines = presenter.result_lines(
            "MatrixExponentiation",
            30,
            &W11::from_u64(832_040),
            Duration::from_millis(10),
            false,
        );
        assert_eq!(lines[0], "Algorithm: MatrixExponentiation");
        assert_eq!(lines.last().unwrap(), "F(30) = 832040");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn details_include_width() {
        let presenter = CLIResultPresenter::new(true, false);
        let lines = presenter.result_lines("Linear", 1000, &W11::max_value(), Duration::from_secs(1), true);
        assert!(lines.contains(&"Width: 704 bits (11 words)".to_string()));
        assert!(lines.contains(&"Result bits: 704".to_string()));
        assert!(lines.last().unwrap().starts_with("F(1,000) = "));
    }

    #[test]
    fn comparison_table() {
        let presenter = CLIResultPresenter::new(false, false);
        let results = vec![
            CalculationResult {
                algorithm: "FastDoubling".into(),
                outcome: Ok(W11::from_u64(55)),
                duration: Duration::from_millis(5),
            },
            CalculationResult {
                algorithm: "Linear".into(),
                outcome: Err(FibError::Cancelled),
                duration: Duration::from_millis(1),
            },
        ];
        let lines = presenter.comparison_lines(&results);
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("[OK]"));
        assert!(lines[4].contains("[ERROR: calculation cancelled]"));

        let quiet = CLIResultPresenter::new(false, true);
        assert!(quiet.comparison_lines(&results).is_empty());
    }
}
