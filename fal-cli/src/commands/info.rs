//! Info command handler

use anyhow::Result;
use colored::*;

use crate::config::{Config, StoredConfig, find_env_key, mask_key};

/// Print tool info: binary, config path and where the API key comes from
pub fn print_info(config: &Config) -> Result<()> {
    println!("{}", "fal: fal.ai CLI".bold());
    println!();

    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());
    println!("  binary:  {}", exe);
    println!(
        "  os/arch: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!("  version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("  config paths by OS:");
    println!("    macOS:    ~/Library/Application Support/fal/config.json");
    println!("    Linux:    ~/.config/fal/config.json");
    println!("    Windows:  %AppData%\\fal\\config.json");
    println!("  config:   {}", config.config_path.display());
    println!();

    let env_key = find_env_key(|name| std::env::var(name).ok());
    let key_source = match &env_key {
        Some((name, _)) => format!("{} env var", name),
        None => match StoredConfig::load(&config.config_path) {
            Ok(stored) if !stored.api_key.is_empty() => "config file".to_string(),
            _ => "(not set)".to_string(),
        },
    };
    println!("  key source: {}", key_source);
    println!();

    println!("  env vars:");
    println!(
        "    FAL_KEY = {}  (also accepts aliases: FAL_API_KEY, FAL_API, ...)",
        mask_key(&std::env::var("FAL_KEY").unwrap_or_default())
    );
    println!();

    println!("  key resolution order:");
    println!("    1. FAL_KEY env var (or aliases)");
    println!("    2. config file  (fal auth set-key)");

    Ok(())
}
