//! kiln CLI Binary
//!
//! Command-line interface for the kiln image build service.

use anyhow::Context;
use clap::Parser;
use kiln::cli::{Cli, RunContext};
use kiln::client::HttpClient;
use kiln::config::ConfigLoader;
use kiln::error::CommandError;
use kiln::logging::{init_logging, LoggingConfig};
use kiln::render::OutputMode;
use std::process;
use std::sync::Arc;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!("kiln CLI starting");

    let context = match bootstrap(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing client: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    match context.execute(&cli.command, &mut out, &mut err).await {
        Ok(()) => {
            debug!("Command completed successfully");
        }
        // Item-level failures were already reported where they occurred
        // (or are embedded in the structured document); the degraded
        // outcome only picks the exit status.
        Err(CommandError::Degraded { failures }) => {
            debug!("Command degraded: {} item(s) failed", failures);
            process::exit(1);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", kiln::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Wire configuration, flag overrides, and the HTTP client into a run
/// context.
fn bootstrap(cli: &Cli) -> anyhow::Result<RunContext> {
    let mut config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(ref url) = cli.url {
        config.api.url = url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout = timeout;
    }
    let client = HttpClient::new(&config.api).context("creating service client")?;
    let mode = if cli.json {
        OutputMode::Structured
    } else {
        OutputMode::Formatted
    };
    Ok(RunContext::new(Arc::new(client), mode))
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::load(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
