//! fibwide: Fibonacci numbers on fixed-width multi-word integers.

use fibwide_lib::errors::exit_code;
use fibwide_lib::{app, config};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = config::AppConfig::parse();
    if let Err(err) = app::run(&config) {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}
