//! Version information.

use fibwide_core::{FixedWidthInt, DEFAULT_WORDS};

/// Get the version string.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version with the default integer width.
#[must_use]
pub fn full_version() -> String {
    format!(
        "fibwide {} (default width {} bits)",
        version(),
        FixedWidthInt::<DEFAULT_WORDS>::BITS
    )
}
