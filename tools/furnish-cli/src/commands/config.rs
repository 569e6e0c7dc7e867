//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use dialoguer::Confirm;
use furnish_storefront::StorefrontConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

/// Copy of the configuration with secrets masked.
fn redacted(config: &StorefrontConfig) -> StorefrontConfig {
    let mut config = config.clone();
    for secret in [
        &mut config.assistant.firestore_api_key,
        &mut config.advisor.api_key,
    ] {
        if !secret.is_empty() {
            *secret = "********".to_string();
        }
    }
    config
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("furnish.toml");

    if config_path.exists() && !force {
        if ctx.output.is_json() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Config init cancelled");
            return Ok(());
        }
    }

    fs::write(&config_path, StorefrontConfig::default().to_toml()?)?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let problems = ctx.config.validate();
    if problems.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for problem in &problems {
        ctx.output.error(&format!("Error: {}", problem));
    }
    bail!("Configuration has {} error(s)", problems.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_masks_only_set_secrets() {
        let mut config = StorefrontConfig::default();
        config.advisor.api_key = "sk-live".to_string();

        let shown = redacted(&config);
        assert_eq!(shown.advisor.api_key, "********");
        assert_eq!(shown.assistant.firestore_api_key, "");
        assert_eq!(shown.advisor.model, config.advisor.model);
    }
}
