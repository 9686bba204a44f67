use clap::Parser;
use macross::cli::{Cli, run};
use tracing_subscriber::EnvFilter;

fn main() -> std::process::ExitCode {
    init_tracing();
    run(Cli::parse())
}

/// Logs go to stderr so stdout carries only the report. `RUST_LOG` overrides
/// the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("macross=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
