//! Constants for widths, progress reporting, the session and exit codes.

/// Word count of the legacy 704-bit configuration.
pub const DEFAULT_WORDS: usize = 11;

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Highest index the exclusive session accepts; larger requests are clamped.
pub const MAX_OFFSET: u64 = 100;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Algorithm results did not match during cross-validation.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Requested index does not fit the configured width.
    pub const ERROR_DOMAIN: i32 = 5;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
