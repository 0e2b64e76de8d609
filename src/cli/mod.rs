//! CLI module for k8s-export
//!
//! Parses arguments, builds the immutable run configuration and the default
//! type registry, and drives one export pass.

mod args;
mod errors;

pub use args::Cli;
pub use errors::{CliError, CliResult};

use clap::CommandFactory;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::export;
use crate::registry::Registry;

/// Parses arguments and runs one export pass
pub fn run() -> CliResult<()> {
    init_tracing();

    let config = match Cli::parse_args().into_config() {
        Ok(config) => config,
        Err(e) => {
            // Usage on stderr, exit 1 via main.
            eprint!("{}", Cli::command().render_help());
            return Err(e);
        }
    };

    let registry = Registry::with_defaults();
    let stats = export::run(&config, &registry)?;

    info!(
        scanned = stats.scanned,
        exported = stats.exported,
        skipped = stats.skipped,
        failed = stats.failed,
        "export complete"
    );
    Ok(())
}

/// Diagnostics go to stderr so exported-content diagnostics on stdout
/// (`Unknown <apiVersion>/<kind>`) stay machine-readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
