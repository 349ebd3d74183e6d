//! Run command handler
//!
//! Runs a model synchronously, or through the queue with polling. The
//! shortcut commands (generate, edit) reuse the same invocation path.

use anyhow::{Context, Result};
use clap::Args;
use fal_client::{FalClient, PollOptions, Poller};
use fal_core::dto::payload::{Payload, parse_payload};
use std::time::Duration;

use crate::config::Config;
use crate::output::{print_poll_event, print_result};

// Arguments of `fal run`
#[derive(Args)]
#[command(after_help = "Examples:
  fal run fal-ai/nano-banana-pro --input '{\"prompt\":\"a cat\"}'
  fal run fal-ai/flux/dev --input '{\"prompt\":\"a cat\"}' --queue
  fal run fal-ai/nano-banana-pro/edit --input '{\"prompt\":\"make it night\",\"image_urls\":[\"https://...\"]}'")]
pub struct RunArgs {
    /// Model endpoint ID, e.g. fal-ai/flux/dev
    pub model: String,

    /// JSON input payload
    #[arg(long)]
    pub input: String,

    #[command(flatten)]
    pub invoke: InvokeArgs,
}

// How a model is invoked, shared with the shortcut commands
#[derive(Args, Debug, Clone, Default)]
pub struct InvokeArgs {
    /// Submit via the queue and poll instead of running synchronously
    #[arg(long)]
    pub queue: bool,

    /// Show model logs while polling the queue (implies --queue)
    #[arg(long)]
    pub logs: bool,

    /// Give up polling after this many seconds (implies --queue; default: wait forever)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl InvokeArgs {
    /// Whether the queue is used
    pub fn queued(&self) -> bool {
        self.queue || self.logs || self.timeout.is_some()
    }

    /// Poll options matching the flags
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::with_logs(self.logs).max_wait(self.timeout.map(Duration::from_secs))
    }
}

/// Handle `fal run`
pub async fn handle_run_command(args: RunArgs, client: &FalClient, config: &Config) -> Result<()> {
    let payload = parse_payload(&args.input).context("invalid --input JSON")?;

    invoke(client, config, &args.model, &payload, &args.invoke).await
}

/// Run `endpoint_id` with `payload` and print the result
pub async fn invoke(
    client: &FalClient,
    config: &Config,
    endpoint_id: &str,
    payload: &Payload,
    args: &InvokeArgs,
) -> Result<()> {
    let body = if args.queued() {
        let poller = Poller::new(client, args.poll_options());
        poller
            .run_queued(endpoint_id, payload, |event| print_poll_event(&event))
            .await?
    } else {
        client.run_sync(endpoint_id, payload).await?
    };

    print_result(&body, config.output)
}
