use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use std::process::Command;

use super::Context;
use crate::config::Config;

pub fn show_config(ctx: &Context) -> Result<()> {
    let mut config = ctx.load_config()?;
    if !config.auth.token.is_empty() {
        config.auth.token = "********".to_string();
    }
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    if let Some(path) = config.path() {
        println!("{}", path.display().to_string().dimmed());
    }
    if let Some(url) = ctx.api_url() {
        println!("API URL overridden for this run: {}", url);
    }
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn edit_config(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let config_file = config
        .path()
        .context("Configuration has no file location")?
        .to_path_buf();

    // Ensure config file exists
    if !config_file.exists() {
        config.save()?;
    }

    // Open in default editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

    let status = Command::new(&editor)
        .arg(&config_file)
        .status()
        .with_context(|| format!("Failed to launch editor {}", editor))?;
    if !status.success() {
        bail!("Editor {} exited with {}", editor, status);
    }

    // Reject edits that no longer parse
    Config::load_from(&config_file)?;
    println!("{} Configuration saved!", "✓".green());

    Ok(())
}

pub fn init_config(ctx: &Context, force: bool) -> Result<()> {
    let config_file = ctx.config_file()?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mut config = Config::with_path(&config_file);
    if let Some(url) = ctx.api_url() {
        config.api.base_url = url.to_string();
    }
    config.save()?;

    println!("{} Configuration initialized at: {}", "✓".green(), config_file.display());
    println!();
    println!("You can edit it with: fitness-tracker config edit");

    Ok(())
}
