//! fibwide library: application logic behind the `fibwide` binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
