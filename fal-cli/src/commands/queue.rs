//! Queue command handlers
//!
//! Handles submitting requests to the queue and following them up:
//! status, result, cancel and polling to completion.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use fal_client::{FalClient, PollOptions, Poller, QueueApi};
use fal_core::dto::payload::parse_payload;
use std::time::Duration;

use crate::config::Config;
use crate::output::{
    OutputMode, print_json, print_key_value, print_poll_event, print_result, print_status,
};

/// Queue subcommands
#[derive(Subcommand)]
pub enum QueueCommands {
    /// Submit a request to the queue without waiting for it
    Submit {
        /// Model endpoint ID
        model: String,

        /// JSON input payload
        #[arg(long)]
        input: String,
    },
    /// Check the status of a queued request (IN_QUEUE, IN_PROGRESS, COMPLETED)
    Status {
        /// Model endpoint ID
        model: String,

        /// Request ID returned by submit
        request_id: String,

        /// Include model logs in output
        #[arg(long)]
        logs: bool,
    },
    /// Get the result of a completed queued request
    Result {
        /// Model endpoint ID
        model: String,

        /// Request ID returned by submit
        request_id: String,
    },
    /// Cancel a request that is still waiting in the queue
    Cancel {
        /// Model endpoint ID
        model: String,

        /// Request ID returned by submit
        request_id: String,
    },
    /// Poll a queued request until completion and print the result
    Poll {
        /// Model endpoint ID
        model: String,

        /// Request ID returned by submit
        request_id: String,

        /// Show model logs while polling
        #[arg(long)]
        logs: bool,

        /// Give up after this many seconds (default: wait forever)
        #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
}

/// Handle queue commands
///
/// # Arguments
/// * `command` - The queue command to execute
/// * `client` - The fal.ai client
/// * `config` - The CLI configuration
pub async fn handle_queue_command(
    command: QueueCommands,
    client: &FalClient,
    config: &Config,
) -> Result<()> {
    match command {
        QueueCommands::Submit { model, input } => submit(client, config, &model, &input).await,
        QueueCommands::Status {
            model,
            request_id,
            logs,
        } => status(client, config, &model, &request_id, logs).await,
        QueueCommands::Result { model, request_id } => {
            let body = client.result(&model, &request_id).await?;
            print_result(&body, config.output)
        }
        QueueCommands::Cancel { model, request_id } => cancel(client, &model, &request_id).await,
        QueueCommands::Poll {
            model,
            request_id,
            logs,
            timeout,
        } => {
            let options = PollOptions::with_logs(logs).max_wait(timeout.map(Duration::from_secs));
            poll(client, config, &model, &request_id, options).await
        }
    }
}

/// Submit a payload and print the queue receipt
async fn submit(client: &FalClient, config: &Config, model: &str, input: &str) -> Result<()> {
    let payload = parse_payload(input).context("invalid --input JSON")?;
    let receipt = client.submit(model, &payload).await?;

    if let OutputMode::Json { pretty } = config.output {
        return print_json(&receipt, pretty);
    }

    print_key_value(&[
        ("REQUEST ID", receipt.request_id.clone()),
        ("STATUS URL", receipt.status_url.clone()),
        ("RESPONSE URL", receipt.response_url.clone()),
        ("CANCEL URL", receipt.cancel_url.clone()),
    ]);
    println!();
    println!(
        "{}",
        format!("Poll with: fal queue poll {} {}", model, receipt.request_id).dimmed()
    );

    Ok(())
}

/// Print the current status of a request
async fn status(
    client: &FalClient,
    config: &Config,
    model: &str,
    request_id: &str,
    logs: bool,
) -> Result<()> {
    let status = client.status(model, request_id, logs).await?;

    match config.output {
        OutputMode::Json { pretty } => print_json(&status, pretty),
        OutputMode::Human => {
            print_status(&status);
            Ok(())
        }
    }
}

/// Request cancellation of a queued request
async fn cancel(client: &FalClient, model: &str, request_id: &str) -> Result<()> {
    client.cancel(model, request_id).await?;

    println!(
        "{} {}",
        "Cancellation requested for:".green(),
        request_id
    );

    Ok(())
}

/// Poll a request until it completes and print the result
async fn poll(
    client: &FalClient,
    config: &Config,
    model: &str,
    request_id: &str,
    options: PollOptions,
) -> Result<()> {
    eprintln!("{} {}", "Polling:".cyan(), request_id);

    let poller = Poller::new(client, options);
    let body = poller
        .poll_until_done(model, request_id, |event| print_poll_event(&event))
        .await?;

    print_result(&body, config.output)
}
