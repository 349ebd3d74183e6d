//! Image generation shortcuts
//!
//! `generate` targets fal-ai/nano-banana-2 and `generate-old` the previous
//! fal-ai/nano-banana-pro. Both build the model payload from flags.

use anyhow::Result;
use clap::Args;
use fal_client::FalClient;
use fal_core::dto::payload::Payload;
use serde_json::Value;

use super::run::{InvokeArgs, invoke};
use crate::config::Config;

/// Text-to-image model behind `fal generate`
pub const GENERATE_MODEL: &str = "fal-ai/nano-banana-2";
/// Text-to-image model behind `fal generate-old`
pub const GENERATE_OLD_MODEL: &str = "fal-ai/nano-banana-pro";

// Arguments of `fal generate` and `fal generate-old`
#[derive(Args)]
#[command(after_help = "Examples:
  fal generate \"a cat wearing a hat\"
  fal generate \"golden gate bridge at sunset\" --aspect 16:9
  fal generate \"portrait of a woman\" --resolution 2K --num 2
  fal generate \"futuristic city\" --format webp --queue")]
pub struct GenerateArgs {
    /// Text prompt
    pub prompt: String,

    /// Aspect ratio: 21:9, 16:9, 3:2, 4:3, 5:4, 1:1, 4:5, 3:4, 2:3, 9:16, auto
    #[arg(long, default_value = "1:1")]
    pub aspect: String,

    #[command(flatten)]
    pub image: ImageOptions,

    #[command(flatten)]
    pub invoke: InvokeArgs,
}

// Options shared by the image generation and editing shortcuts
#[derive(Args, Debug, Clone)]
pub struct ImageOptions {
    /// Resolution (4K billed at 2x)
    #[arg(long, default_value = "1K", value_parser = ["1K", "2K", "4K"])]
    pub resolution: String,

    /// Number of images to generate
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub num: u8,

    /// Output format
    #[arg(long, default_value = "png", value_parser = ["jpeg", "png", "webp"])]
    pub format: String,

    /// Safety tolerance, 1 (strictest) to 6 (least strict)
    #[arg(long, default_value = "4", value_parser = ["1", "2", "3", "4", "5", "6"])]
    pub safety: String,

    /// Random seed (0 = random)
    #[arg(long, default_value_t = 0)]
    pub seed: i64,

    /// Enable web search grounding (+$0.015/image)
    #[arg(long)]
    pub web_search: bool,

    /// Enable Google search grounding
    #[arg(long)]
    pub google_search: bool,
}

impl ImageOptions {
    /// Build a payload for `prompt` with the given aspect ratio
    pub fn payload(&self, prompt: &str, aspect: &str) -> Payload {
        let mut payload = Payload::new();
        payload.insert("prompt".to_string(), Value::from(prompt));
        payload.insert("aspect_ratio".to_string(), Value::from(aspect));
        payload.insert("resolution".to_string(), Value::from(self.resolution.as_str()));
        payload.insert("num_images".to_string(), Value::from(self.num));
        payload.insert("output_format".to_string(), Value::from(self.format.as_str()));
        payload.insert("safety_tolerance".to_string(), Value::from(self.safety.as_str()));

        if self.seed != 0 {
            payload.insert("seed".to_string(), Value::from(self.seed));
        }
        if self.web_search {
            payload.insert("enable_web_search".to_string(), Value::Bool(true));
        }
        if self.google_search {
            payload.insert("enable_google_search".to_string(), Value::Bool(true));
        }

        payload
    }
}

/// Handle `fal generate` / `fal generate-old`
pub async fn handle_generate(
    args: GenerateArgs,
    model: &str,
    client: &FalClient,
    config: &Config,
) -> Result<()> {
    let payload = args.image.payload(&args.prompt, &args.aspect);

    invoke(client, config, model, &payload, &args.invoke).await
}
