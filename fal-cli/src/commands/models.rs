//! Model catalog command handlers
//!
//! Handles listing the fal.ai model catalog and looking up prices.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use fal_client::FalClient;
use fal_core::dto::catalog::ModelQuery;

use crate::config::Config;
use crate::output::{OutputMode, print_json, print_table, truncate};

/// Width of the NAME column in `models list`
const NAME_WIDTH: usize = 35;

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommands {
    /// List models from the fal.ai catalog
    #[command(after_help = "Examples:
  fal models list
  fal models list --category text-to-image
  fal models list --search flux
  fal models list --category image-to-video --limit 10")]
    List {
        /// Free-text search query
        #[arg(long)]
        search: Option<String>,

        /// Filter by category (e.g. text-to-image, image-to-video)
        #[arg(long)]
        category: Option<String>,

        /// Max number of models to return
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Show pricing for one or more models
    #[command(after_help = "Examples:
  fal models pricing fal-ai/nano-banana-pro
  fal models pricing fal-ai/flux/dev fal-ai/flux/schnell")]
    Pricing {
        /// Model endpoint IDs
        #[arg(required = true)]
        models: Vec<String>,
    },
}

/// Handle models commands
///
/// # Arguments
/// * `command` - The models command to execute
/// * `client` - The fal.ai client
/// * `config` - The CLI configuration
pub async fn handle_models_command(
    command: ModelsCommands,
    client: &FalClient,
    config: &Config,
) -> Result<()> {
    match command {
        ModelsCommands::List {
            search,
            category,
            limit,
        } => {
            let query = ModelQuery {
                search,
                category,
                cursor: None,
                limit,
            };
            list_models(client, config, &query).await
        }
        ModelsCommands::Pricing { models } => model_pricing(client, config, &models).await,
    }
}

/// List catalog models
async fn list_models(client: &FalClient, config: &Config, query: &ModelQuery) -> Result<()> {
    let page = client.list_models(query).await?;

    if let OutputMode::Json { pretty } = config.output {
        return print_json(&page.models, pretty);
    }

    if page.models.is_empty() {
        println!("{}", "No models found.".yellow());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = page
        .models
        .iter()
        .map(|m| {
            vec![
                m.endpoint_id.clone(),
                truncate(&m.metadata.display_name, NAME_WIDTH),
                m.metadata.category.clone(),
                m.metadata.status.clone(),
            ]
        })
        .collect();
    print_table(&["ENDPOINT ID", "NAME", "CATEGORY", "STATUS"], &rows);

    if page.has_more {
        println!();
        println!(
            "{}",
            format!(
                "({} shown, more available; increase --limit to see more)",
                page.models.len()
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Show prices for the given endpoints
async fn model_pricing(client: &FalClient, config: &Config, models: &[String]) -> Result<()> {
    let page = client.model_pricing(models).await?;

    if let OutputMode::Json { pretty } = config.output {
        return print_json(&page.prices, pretty);
    }

    if page.prices.is_empty() {
        println!(
            "{}",
            "No pricing info found for the given model(s).".yellow()
        );
        return Ok(());
    }

    let rows: Vec<Vec<String>> = page
        .prices
        .iter()
        .map(|p| {
            vec![
                p.endpoint_id.clone(),
                format!("{:.4}", p.unit_price),
                p.unit.clone(),
                p.currency.to_uppercase(),
            ]
        })
        .collect();
    print_table(&["ENDPOINT ID", "PRICE", "UNIT", "CURRENCY"], &rows);

    Ok(())
}
