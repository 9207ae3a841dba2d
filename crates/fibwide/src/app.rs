//! Application entry point and dispatch.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use fibwide_cli::output::{write_to_file, SweepWriter};
use fibwide_cli::presenter::CLIResultPresenter;
use fibwide_cli::sweep_progress::SweepProgress;
use fibwide_core::calculator::FibError;
use fibwide_core::engine::{check_domain, max_fib_index, render};
use fibwide_core::observer::ProgressSubject;
use fibwide_core::observers::LoggingObserver;
use fibwide_core::options::Options;
use fibwide_core::progress::CancellationToken;
use fibwide_core::registry::DefaultFactory;
use fibwide_core::FixedWidthInt;
use fibwide_orchestration::calculator_selection::get_calculators_to_run;
use fibwide_orchestration::interfaces::{CalculationResult, ComparisonReport, ResultPresenter};
use fibwide_orchestration::orchestrator::{
    analyze_comparison_results, execute_calculations_in_order, execute_calculations_with_observer,
};
use fibwide_orchestration::sweep::sweep;

use crate::config::{AppConfig, Width};
use crate::version::full_version;

/// Minimum milliseconds between progress log lines.
const LOG_INTERVAL_MS: u64 = 250;

/// Run the application.
///
/// # Errors
///
/// Any `FibError` from validation or calculation, or an I/O error while
/// writing output.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        fibwide_cli::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    info!(version = %full_version(), width = ?config.width, "starting");

    match config.width {
        Width::W704 => run_width::<11>(config),
        Width::W2048 => run_width::<32>(config),
        Width::W8192 => run_width::<128>(config),
    }
}

fn run_width<const N: usize>(config: &AppConfig) -> Result<()> {
    if config.max_index {
        println!("{}", max_fib_index::<N>());
        return Ok(());
    }

    let timeout = config.timeout_duration()?;

    if let Some(id) = config.pin_cpu {
        pin_to_cpu(id);
    }

    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());

    match config.sweep {
        Some(max_n) => run_sweep::<N>(config, max_n, &cancel.with_timeout(timeout)),
        None => run_compute::<N>(config, &cancel, timeout),
    }
}

fn run_compute<const N: usize>(
    config: &AppConfig,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<()> {
    check_domain::<N>(config.n)?;

    let opts = Options::with_strategy(config.mul.into());

    let factory = DefaultFactory::<N>::new();
    let calculators = get_calculators_to_run(&config.algo, &factory)?;

    let subject = ProgressSubject::new();
    subject.register(Arc::new(LoggingObserver::new(LOG_INTERVAL_MS)));

    // A pinned run stays on this thread so the pin covers every timing.
    let results = if config.pin_cpu.is_some() {
        execute_calculations_in_order(&calculators, config.n, &opts, cancel, Some(timeout), &subject)
    } else {
        execute_calculations_with_observer(&calculators, config.n, &opts, cancel, Some(timeout), &subject)
    };

    if let Some(err) = first_error_if_all_failed(&results) {
        return Err(err.into());
    }

    let report = ComparisonReport {
        n: config.n,
        results,
    };
    let mismatch = report.results.len() > 1
        && matches!(
            analyze_comparison_results(&report.results),
            Err(FibError::Mismatch)
        );

    if config.json {
        print_json(&report)?;
    } else {
        present(config, &report);
    }

    if let Some(path) = &config.output {
        if let Some(value) = report.value() {
            write_to_file(path, &render(value)?)?;
            debug!(path = %path.display(), "result written");
        }
    }

    if mismatch {
        return Err(FibError::Mismatch.into());
    }
    Ok(())
}

fn first_error_if_all_failed<const N: usize>(results: &[CalculationResult<N>]) -> Option<FibError> {
    if results.iter().any(|r| r.outcome.is_ok()) {
        return None;
    }
    results.iter().find_map(|r| r.outcome.clone().err())
}

fn present<const N: usize>(config: &AppConfig, report: &ComparisonReport<N>) {
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);

    if config.quiet {
        // One number, however many algorithms ran.
        if config.calculate {
            if let Some(value) = report.value() {
                ResultPresenter::<N>::present_result(
                    &presenter,
                    "",
                    report.n,
                    value,
                    Duration::ZERO,
                    false,
                );
            }
        }
        return;
    }

    for result in &report.results {
        match &result.outcome {
            Ok(value) => ResultPresenter::<N>::present_result(
                &presenter,
                &result.algorithm,
                report.n,
                value,
                result.duration,
                config.details,
            ),
            Err(e) => {
                ResultPresenter::<N>::present_error(&presenter, &format!("{}: {e}", result.algorithm));
            }
        }
    }

    if report.results.len() > 1 {
        ResultPresenter::<N>::present_comparison(&presenter, &report.results);
    }
}

#[derive(Serialize)]
struct JsonResult<'a> {
    algorithm: &'a str,
    duration_ns: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    n: u64,
    width_bits: u32,
    value: Option<String>,
    agreed: bool,
    results: Vec<JsonResult<'a>>,
}

fn print_json<const N: usize>(report: &ComparisonReport<N>) -> Result<()> {
    let value = report.value().map(render).transpose()?;
    let summary = JsonSummary {
        n: report.n,
        width_bits: FixedWidthInt::<N>::BITS,
        value,
        agreed: report.agreed(),
        results: report
            .results
            .iter()
            .map(|r| JsonResult {
                algorithm: &r.algorithm,
                duration_ns: u64::try_from(r.duration.as_nanos()).unwrap_or(u64::MAX),
                error: r.outcome.as_ref().err().map(ToString::to_string),
            })
            .collect(),
    };
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;
    Ok(())
}

fn run_sweep<const N: usize>(config: &AppConfig, max_n: u64, cancel: &CancellationToken) -> Result<()> {
    let out: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = SweepWriter::new(out);
    let mut progress = SweepProgress::new(max_n, config.quiet);
    let mut measured = Vec::new();

    let swept = sweep::<N>(max_n, config.mul.into(), cancel, |row| {
        progress.on_row(row);
        if config.json {
            measured.push(*row);
        } else {
            writer.write_row(row);
        }
    });
    progress.finish();

    // Rows measured before a timeout or Ctrl+C are still written.
    let written = writer.finish().and_then(|mut out| {
        if config.json {
            serde_json::to_writer_pretty(&mut out, &measured)?;
            writeln!(out)?;
        }
        out.flush()
    });
    swept?;
    written?;

    if progress.mismatches() > 0 {
        warn!(mismatches = progress.mismatches(), "sweep found disagreeing rows");
        return Err(FibError::Mismatch.into());
    }
    Ok(())
}

fn pin_to_cpu(id: usize) {
    let core = core_affinity::get_core_ids()
        .and_then(|ids| ids.into_iter().find(|core| core.id == id));
    match core {
        Some(core) if core_affinity::set_for_current(core) => debug!(cpu = id, "pinned"),
        Some(_) => warn!(cpu = id, "failed to pin to CPU"),
        None => warn!(cpu = id, "CPU not found, running unpinned"),
    }
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(error = %e, "could not install Ctrl+C handler");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type W2 = FixedWidthInt<2>;

    fn result(outcome: Result<W2, FibError>) -> CalculationResult<2> {
        CalculationResult {
            algorithm: "Linear".into(),
            outcome,
            duration: Duration::from_millis(1),
        }
    }

    #[test]
    fn all_failed_returns_first_error() {
        let results = [result(Err(FibError::Timeout("1s".into()))), result(Err(FibError::Cancelled))];
        assert_eq!(
            first_error_if_all_failed(&results),
            Some(FibError::Timeout("1s".into()))
        );
    }

    #[test]
    fn one_success_is_enough() {
        let results = [result(Err(FibError::Cancelled)), result(Ok(W2::from_u64(5)))];
        assert_eq!(first_error_if_all_failed(&results), None);
    }
}
