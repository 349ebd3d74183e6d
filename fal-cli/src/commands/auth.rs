//! Auth command handlers
//!
//! Manages the API key stored in the config file.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;

use crate::config::{Config, StoredConfig, find_env_key, mask_key};

/// Shortest API key accepted by `set-key`
const MIN_KEY_LENGTH: usize = 8;

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Save a fal.ai API key to the config file
    ///
    /// Get your API key from: https://fal.ai/dashboard/keys
    ///
    /// You can also set the FAL_KEY env var instead of using this command.
    SetKey {
        /// The API key
        api_key: String,
    },
    /// Show current authentication status
    Status,
    /// Remove the saved API key from the config file
    Logout,
}

/// Handle auth commands
///
/// # Arguments
/// * `command` - The auth command to execute
/// * `config` - The CLI configuration
pub fn handle_auth_command(command: AuthCommands, config: &Config) -> Result<()> {
    match command {
        AuthCommands::SetKey { api_key } => set_key(config, &api_key),
        AuthCommands::Status => status(config),
        AuthCommands::Logout => logout(config),
    }
}

fn set_key(config: &Config, api_key: &str) -> Result<()> {
    let api_key = api_key.trim();
    if api_key.chars().count() < MIN_KEY_LENGTH {
        bail!("API key looks too short, check your key at https://fal.ai/dashboard/keys");
    }

    StoredConfig {
        api_key: api_key.to_string(),
    }
    .save(&config.config_path)
    .context("saving config")?;

    println!(
        "{} {}",
        "API key saved to".green(),
        config.config_path.display()
    );
    println!("Key: {}", mask_key(api_key));

    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let stored = StoredConfig::load(&config.config_path).context("loading config")?;

    println!("Config: {}", config.config_path.display());
    println!();

    if let Some((name, key)) = find_env_key(|name| std::env::var(name).ok()) {
        println!(
            "Key source: {} env var {}",
            name,
            "(takes priority over config)".dimmed()
        );
        println!("Key:        {}", mask_key(&key));
    } else if !stored.api_key.is_empty() {
        println!("Key source: config file");
        println!("Key:        {}", mask_key(&stored.api_key));
    } else {
        println!("{}", "Status: not authenticated".yellow());
        println!();
        println!("Run: fal auth set-key <your-api-key>");
        println!("Or:  export FAL_KEY=<your-api-key>");
    }

    Ok(())
}

fn logout(config: &Config) -> Result<()> {
    StoredConfig::clear(&config.config_path).context("removing config")?;

    println!("{}", "API key removed from config.".green());
    println!("Set FAL_KEY env var if you still need access.");

    Ok(())
}
