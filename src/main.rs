mod cli;
mod error;
mod filters;
mod fmt;
mod importer;
mod models;
mod reconciler;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = cli::verify::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so the report on stdout stays clean.
/// `--verbose` forces debug; otherwise `RUST_LOG` or info.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
