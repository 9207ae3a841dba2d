//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use fibwide_core::bignum::MulStrategy;
use fibwide_core::calculator::FibError;

/// fibwide: compare three Fibonacci algorithms on fixed-width integers.
#[derive(Parser, Debug)]
#[command(name = "fibwide", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Fibonacci index to compute.
    #[arg(short, long, default_value = "100", env = "FIBWIDE_N")]
    pub n: u64,

    /// Algorithm to use: linear, matrix, fast, or all.
    #[arg(long, default_value = "all")]
    pub algo: String,

    /// Integer width.
    #[arg(long, value_enum, default_value_t = Width::W704)]
    pub width: Width,

    /// Multiplication strategy.
    #[arg(long = "mul", value_enum, default_value_t = MulChoice::SkipZeros)]
    pub mul: MulChoice,

    /// Display the computed value.
    #[arg(short, long)]
    pub calculate: bool,

    /// Verbose output (full digits).
    #[arg(short, long)]
    pub verbose: bool,

    /// Show detailed information.
    #[arg(short, long)]
    pub details: bool,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quiet mode: no tables. With `-c`, print only the number.
    #[arg(short, long)]
    pub quiet: bool,

    /// Timeout duration (e.g., "5m", "30s", "500ms").
    #[arg(long, default_value = "5m")]
    pub timeout: String,

    /// Time all algorithms for every index 0..=MAX.
    #[arg(long, value_name = "MAX")]
    pub sweep: Option<u64>,

    /// Pin to this CPU. Calculators then run one after another on the pinned thread.
    #[arg(long, value_name = "ID")]
    pub pin_cpu: Option<usize>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Print the largest index that fits the width and exit.
    #[arg(long)]
    pub max_index: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

/// Supported integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Width {
    /// 11 words, 704 bits.
    W704,
    /// 32 words, 2048 bits.
    W2048,
    /// 128 words, 8192 bits.
    W8192,
}

impl Width {
    #[must_use]
    pub fn words(self) -> usize {
        match self {
            Self::W704 => 11,
            Self::W2048 => 32,
            Self::W8192 => 128,
        }
    }
}

/// `MulStrategy` as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MulChoice {
    Naive,
    SkipZeros,
}

impl From<MulChoice> for MulStrategy {
    fn from(choice: MulChoice) -> Self {
        match choice {
            MulChoice::Naive => Self::Naive,
            MulChoice::SkipZeros => Self::SkipZeros,
        }
    }
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the timeout string.
    ///
    /// # Errors
    ///
    /// `FibError::Config` when the string is not a duration.
    pub fn timeout_duration(&self) -> Result<Duration, FibError> {
        parse_duration(&self.timeout)
            .ok_or_else(|| FibError::Config(format!("invalid timeout: {:?}", self.timeout)))
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms" or bare seconds.
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else {
        s.parse().ok().map(Duration::from_secs)
    }
}
