//! metro-reserve CLI - book a metro entry slot, retrying until one is granted
//!
//! This is the main entry point for the metro-reserve command-line interface.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Must run before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Book(args) => commands::book::run(args, cli.config.as_deref()).await,
        Commands::Config(cmd) => {
            commands::config::run(cmd, cli.config.as_deref()).map(|()| ExitCode::SUCCESS)
        }
        Commands::Version(args) => commands::version::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Completions(args) => {
            commands::completions::run(args).map(|()| ExitCode::SUCCESS)
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // attempt failures log at warn, so info shows the whole run
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
