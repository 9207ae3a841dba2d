//! Error handling and exit codes.

use fibwide_core::calculator::FibError;
use fibwide_core::constants::exit_codes;

/// Map a calculation error to the process exit code.
#[must_use]
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::Calculation(_) | FibError::Busy | FibError::Arithmetic(_) => {
            exit_codes::ERROR_GENERIC
        }
        FibError::Config(_) => exit_codes::ERROR_CONFIG,
        FibError::Cancelled => exit_codes::ERROR_CANCELED,
        FibError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        FibError::Mismatch => exit_codes::ERROR_MISMATCH,
        FibError::Domain { .. } => exit_codes::ERROR_DOMAIN,
    }
}

/// Exit code for any error reaching `main`. I/O and other non-calculation
/// failures are generic.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<FibError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
