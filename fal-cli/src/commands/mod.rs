//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod auth;
mod edit;
mod generate;
mod info;
mod models;
mod queue;
mod run;

pub use auth::AuthCommands;
pub use edit::EditArgs;
pub use generate::GenerateArgs;
pub use models::ModelsCommands;
pub use queue::QueueCommands;
pub use run::RunArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage fal.ai authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Show tool info: config path, key status, and environment
    Info,
    /// Browse and search the fal.ai model catalog
    Models {
        #[command(subcommand)]
        command: ModelsCommands,
    },
    /// Run a model (synchronous by default, use --queue for async)
    Run(RunArgs),
    /// Manage queue requests
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Generate images with nano-banana-2 (fal-ai/nano-banana-2)
    Generate(GenerateArgs),
    /// Generate images with nano-banana-pro (fal-ai/nano-banana-pro, previous model)
    GenerateOld(GenerateArgs),
    /// Edit images with nano-banana-2 (fal-ai/nano-banana-2/edit)
    Edit(EditArgs),
    /// Edit images with nano-banana-pro (fal-ai/nano-banana-pro/edit, previous model)
    EditOld(EditArgs),
}

/// Handle a CLI command
///
/// Local commands run without credentials. Every other command resolves the
/// API key and builds the client once, then passes it to its handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let connect = || config.connect();

    match command {
        Commands::Auth { command } => auth::handle_auth_command(command, config),
        Commands::Info => info::print_info(config),
        Commands::Models { command } => {
            models::handle_models_command(command, &connect()?, config).await
        }
        Commands::Run(args) => run::handle_run_command(args, &connect()?, config).await,
        Commands::Queue { command } => {
            queue::handle_queue_command(command, &connect()?, config).await
        }
        Commands::Generate(args) => {
            generate::handle_generate(args, generate::GENERATE_MODEL, &connect()?, config).await
        }
        Commands::GenerateOld(args) => {
            generate::handle_generate(args, generate::GENERATE_OLD_MODEL, &connect()?, config)
                .await
        }
        Commands::Edit(args) => {
            edit::handle_edit(args, edit::EDIT_MODEL, &connect()?, config).await
        }
        Commands::EditOld(args) => {
            edit::handle_edit(args, edit::EDIT_OLD_MODEL, &connect()?, config).await
        }
    }
}
