//! # fibwide-orchestration
//!
//! Runs calculators side by side, compares their results, sweeps timings
//! over a range of indices and serves one exclusive compute session at a
//! time.

pub mod calculator_selection;
pub mod interfaces;
pub mod orchestrator;
pub mod session;
pub mod sweep;

pub use interfaces::{CalculationResult, ComparisonReport, ResultPresenter};
pub use orchestrator::{analyze_comparison_results, compute_and_compare, execute_calculations};
pub use session::{Device, Request, Response, Session};
pub use sweep::{sweep, SweepRow};
