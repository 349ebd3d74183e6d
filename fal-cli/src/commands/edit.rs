//! Image editing shortcuts
//!
//! `edit` targets fal-ai/nano-banana-2/edit and `edit-old` the previous
//! fal-ai/nano-banana-pro/edit. Source images are passed by URL.

use anyhow::Result;
use clap::Args;
use fal_client::FalClient;
use fal_core::dto::payload::Payload;
use serde_json::Value;

use super::generate::ImageOptions;
use super::run::{InvokeArgs, invoke};
use crate::config::Config;

/// Image-to-image model behind `fal edit`
pub const EDIT_MODEL: &str = "fal-ai/nano-banana-2/edit";
/// Image-to-image model behind `fal edit-old`
pub const EDIT_OLD_MODEL: &str = "fal-ai/nano-banana-pro/edit";

// Arguments of `fal edit` and `fal edit-old`
#[derive(Args)]
#[command(after_help = "Examples:
  fal edit \"make it night time\" --image https://example.com/photo.jpg
  fal edit \"add snow\" --image https://example.com/city.jpg --aspect 16:9
  fal edit \"merge these\" --image https://... --image https://... --num 2")]
pub struct EditArgs {
    /// Edit instruction
    pub prompt: String,

    /// Image URL to edit (repeatable)
    #[arg(long = "image", value_name = "URL", required = true)]
    pub images: Vec<String>,

    /// Aspect ratio: 21:9, 16:9, 3:2, 4:3, 5:4, 1:1, 4:5, 3:4, 2:3, 9:16, auto
    #[arg(long, default_value = "auto")]
    pub aspect: String,

    #[command(flatten)]
    pub image: ImageOptions,

    #[command(flatten)]
    pub invoke: InvokeArgs,
}

impl EditArgs {
    /// Payload for the edit model
    pub fn payload(&self) -> Payload {
        let mut payload = self.image.payload(&self.prompt, &self.aspect);
        payload.insert(
            "image_urls".to_string(),
            Value::from(self.images.clone()),
        );
        payload
    }
}

/// Handle `fal edit` / `fal edit-old`
pub async fn handle_edit(
    args: EditArgs,
    model: &str,
    client: &FalClient,
    config: &Config,
) -> Result<()> {
    let payload = args.payload();

    invoke(client, config, model, &payload, &args.invoke).await
}
