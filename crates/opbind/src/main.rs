use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use opbind::cli::build_cli;

fn main() -> Result<ExitCode> {
    let matches = build_cli().get_matches();

    let config = opbind::load_config(matches.get_one::<String>("config").map(Path::new))?;
    let config = opbind::Config {
        pretty: config.pretty || matches.get_flag("pretty"),
        ..config
    };

    init_tracing(&config.log_level)?;
    opbind::cli::handlers::dispatch(&matches, &config)
}

/// Initialize tracing subscriber for logging
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so
/// stdout carries only JSON.
fn init_tracing(default_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
