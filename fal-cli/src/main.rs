//! fal CLI
//!
//! Command-line interface for the fal.ai API.
//!
//! Output is JSON when stdout is piped (for scripts and agents) and
//! human-readable tables in a terminal.

mod commands;
mod config;
mod output;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use output::OutputMode;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fal")]
#[command(about = "fal.ai CLI: run generative AI models via fal.ai")]
#[command(long_about = "fal is a CLI tool for the fal.ai API.

It outputs JSON when piped (for agent use) and human-readable tables in a terminal.

API key resolution order:
  1. FAL_KEY env var (or aliases: FAL_API_KEY, FAL_API, API_KEY_FAL, ...)
  2. Config file (written by: fal auth set-key)")]
struct Cli {
    /// Force JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Force pretty-printed JSON output (implies --json)
    #[arg(long, global = true)]
    pretty: bool,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::new(OutputMode::detect(cli.json, cli.pretty));

    match handle_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for results
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "fal=debug,fal_client=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
