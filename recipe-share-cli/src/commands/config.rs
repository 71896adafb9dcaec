//! Configuration commands

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::{AuthMethod, CliConfig, Credentials, Profile, Settings};
use crate::context::Context;
use crate::output::OutputFormat;

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key, e.g. settings.listing_debounce_ms or profile.work.api_url.
        /// A bare profile field (api_url, blob_url, output_format) applies to the active profile.
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// List all profiles
    Profiles,

    /// Set the default profile
    UseProfile {
        /// Profile name to use as default
        name: String,
    },

    /// Create a new profile
    CreateProfile {
        /// Profile name
        name: String,

        /// API URL for this profile
        #[arg(long)]
        api_url: Option<String>,

        /// Image store URL for this profile
        #[arg(long)]
        blob_url: Option<String>,

        /// Copy settings from another profile
        #[arg(long)]
        from: Option<String>,
    },

    /// Delete a profile
    DeleteProfile {
        /// Profile name to delete
        name: String,

        /// Force deletion without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file paths
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Force reset without confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Execute configuration commands
pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Set { key, value } => {
            let mut config = ctx.config.clone();
            set_value(&mut config, ctx.active_profile(), &key, &value)?;
            config.save().context("Failed to save configuration")?;
            ctx.output.success(&format!("Set {} = {}", key, value));
            Ok(())
        }
        ConfigSubcommand::Get { key } => {
            println!("{}", get_value(&ctx.config, ctx.active_profile(), &key)?);
            Ok(())
        }
        ConfigSubcommand::Profiles => list_profiles(ctx),
        ConfigSubcommand::UseProfile { name } => use_profile(ctx, &name),
        ConfigSubcommand::CreateProfile {
            name,
            api_url,
            blob_url,
            from,
        } => create_profile(ctx, &name, api_url, blob_url, from.as_deref()),
        ConfigSubcommand::DeleteProfile { name, force } => delete_profile(ctx, &name, force),
        ConfigSubcommand::Path => show_paths(),
        ConfigSubcommand::Reset { force } => reset(ctx, force),
    }
}

fn confirm(prompt: String) -> Result<bool> {
    tokio::task::block_in_place(|| {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
    })
    .context("Failed to get confirmation")
}

fn auth_label(auth: &AuthMethod) -> &'static str {
    match auth {
        AuthMethod::None => "none",
        AuthMethod::SessionToken {
            use_keyring: true, ..
        } => "session token (keyring)",
        AuthMethod::SessionToken { .. } => "session token",
    }
}

fn show(ctx: &Context) -> Result<()> {
    println!("{}", "Configuration".bold().underline());
    println!();

    let settings = &ctx.config.settings;
    println!("{}", "Settings:".cyan());
    println!("  output_format: {}", settings.output_format);
    println!("  color: {}", settings.color);
    println!("  verbose: {}", settings.verbose);
    println!("  timeout_secs: {}", settings.timeout_secs);
    println!("  max_retries: {}", settings.max_retries);
    println!("  listing_debounce_ms: {}", settings.listing_debounce_ms);

    if ctx.settings != ctx.config.settings {
        println!("  {}", "(environment overrides are active)".dimmed());
    }

    if let Some(default) = &ctx.config.default_profile {
        println!();
        println!("{}: {}", "Default profile".cyan(), default);
    }

    println!();
    println!("{}", "Profiles:".cyan());

    if ctx.config.profiles.is_empty() {
        println!("  No profiles configured");
    }
    for name in ctx.config.list_profiles() {
        let Some(profile) = ctx.config.profiles.get(name) else {
            continue;
        };
        let marker = if ctx.config.default_profile.as_deref() == Some(name) {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!("  [{}]{}", name, marker);
        println!("    api_url: {}", profile.api_url());
        if let Some(blob_url) = &profile.blob_url {
            println!("    blob_url: {}", blob_url);
        }
        println!("    auth: {}", auth_label(&profile.auth));
        if let Some(format) = &profile.output_format {
            println!("    output_format: {}", format);
        }
        for (header, value) in &profile.headers {
            println!("    header {}: {}", header, value);
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    value.parse().context("Invalid boolean value")
}

fn check_format(value: &str) -> Result<String> {
    value
        .parse::<OutputFormat>()
        .map(|format| format.to_string())
        .map_err(|_| anyhow::anyhow!("Unknown output format: {}", value))
}

fn set_setting(settings: &mut Settings, name: &str, value: &str) -> Result<()> {
    match name {
        "output_format" => settings.output_format = check_format(value)?,
        "color" => settings.color = parse_bool(value)?,
        "verbose" => settings.verbose = parse_bool(value)?,
        "timeout_secs" => settings.timeout_secs = value.parse().context("Invalid number")?,
        "max_retries" => settings.max_retries = value.parse().context("Invalid number")?,
        "listing_debounce_ms" => {
            settings.listing_debounce_ms = value.parse().context("Invalid number")?
        }
        _ => bail!("Unknown setting: {}", name),
    }
    Ok(())
}

fn set_profile_field(profile: &mut Profile, field: &str, value: &str) -> Result<()> {
    let value = Some(value.to_string()).filter(|v| !v.is_empty());
    match field {
        "api_url" => profile.api_url = value,
        "blob_url" => profile.blob_url = value,
        "output_format" => profile.output_format = value.as_deref().map(check_format).transpose()?,
        _ => bail!("Unknown profile field: {}", field),
    }
    Ok(())
}

/// Apply `key = value`; an empty value unsets a profile field
pub fn set_value(config: &mut CliConfig, active_profile: &str, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["settings", name] => set_setting(&mut config.settings, name, value),
        ["profile", name, field] => {
            set_profile_field(config.get_or_create_profile(name), field, value)
        }
        [field] => set_profile_field(config.get_or_create_profile(active_profile), field, value),
        _ => bail!("Unknown configuration key: {}", key),
    }
}

fn profile_field(profile: &Profile, field: &str) -> Result<String> {
    Ok(match field {
        "api_url" => profile.api_url().to_string(),
        "blob_url" => profile.blob_url.clone().unwrap_or_default(),
        "output_format" => profile.output_format.clone().unwrap_or_default(),
        _ => bail!("Unknown profile field: {}", field),
    })
}

pub fn get_value(config: &CliConfig, active_profile: &str, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let settings = &config.settings;
    match parts.as_slice() {
        ["settings", name] => Ok(match *name {
            "output_format" => settings.output_format.clone(),
            "color" => settings.color.to_string(),
            "verbose" => settings.verbose.to_string(),
            "timeout_secs" => settings.timeout_secs.to_string(),
            "max_retries" => settings.max_retries.to_string(),
            "listing_debounce_ms" => settings.listing_debounce_ms.to_string(),
            _ => bail!("Unknown setting: {}", name),
        }),
        ["default_profile"] => Ok(config
            .default_profile
            .clone()
            .unwrap_or_else(|| "not set".to_string())),
        ["profile", name, field] => {
            let profile = config
                .get_profile(Some(*name))
                .with_context(|| format!("Profile '{}' not found", name))?;
            profile_field(profile, field)
        }
        [field] => {
            let profile = config.get_profile(Some(active_profile)).cloned().unwrap_or_default();
            profile_field(&profile, field)
        }
        _ => bail!("Unknown configuration key: {}", key),
    }
}

fn list_profiles(ctx: &Context) -> Result<()> {
    if ctx.config.profiles.is_empty() {
        ctx.output
            .info("No profiles configured. Run 'recipe-share auth login' to create one.");
        return Ok(());
    }

    println!("{}", "Configured profiles:".bold());
    println!();

    for name in ctx.config.list_profiles() {
        if ctx.config.default_profile.as_deref() == Some(name) {
            println!("  {} {}", "→".green(), name.green().bold());
        } else {
            println!("    {}", name);
        }
    }

    Ok(())
}

fn use_profile(ctx: &Context, name: &str) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        bail!(
            "Profile '{}' not found. Run 'recipe-share config profiles' to list available profiles.",
            name
        );
    }

    config.set_default_profile(name);
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Now using profile '{}'", name));
    Ok(())
}

fn create_profile(
    ctx: &Context,
    name: &str,
    api_url: Option<String>,
    blob_url: Option<String>,
    from: Option<&str>,
) -> Result<()> {
    let mut config = ctx.config.clone();

    if config.profiles.contains_key(name) {
        bail!("Profile '{}' already exists", name);
    }

    let mut profile = match from {
        Some(source) => config
            .get_profile(Some(source))
            .cloned()
            .with_context(|| format!("Source profile '{}' not found", source))?,
        None => Profile::default(),
    };
    // Tokens are never copied between profiles
    profile.auth = AuthMethod::None;
    if api_url.is_some() {
        profile.api_url = api_url;
    }
    if blob_url.is_some() {
        profile.blob_url = blob_url;
    }

    config.profiles.insert(name.to_string(), profile);
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Created profile '{}'", name));
    if let Some(source) = from {
        ctx.output.info(&format!("Copied settings from '{}'", source));
    }
    Ok(())
}

fn delete_profile(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        bail!("Profile '{}' not found", name);
    }

    if !force && !confirm(format!("Delete profile '{}'?", name))? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    config.remove_profile(name);
    config.save().context("Failed to save configuration")?;

    let mut credentials = ctx.credentials.clone();
    credentials.remove(name);
    credentials.save().context("Failed to save credentials")?;

    ctx.output.success(&format!("Deleted profile '{}'", name));
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("{}", "Configuration paths:".bold());
    println!();

    for (label, path) in [
        ("Config:     ", CliConfig::config_path()),
        ("Credentials:", CliConfig::credentials_path()),
    ] {
        match path {
            Ok(path) => {
                let status = if path.exists() { "✓".green() } else { "✗".red() };
                println!("  {} {} {}", label, status, path.display());
            }
            Err(e) => println!("  {} Error: {}", label, e),
        }
    }

    Ok(())
}

fn reset(ctx: &Context, force: bool) -> Result<()> {
    if !force
        && !confirm("Reset all configuration to defaults? This cannot be undone.".to_string())?
    {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    CliConfig::default()
        .save()
        .context("Failed to save configuration")?;
    Credentials::default()
        .save()
        .context("Failed to save credentials")?;

    ctx.output.success("Configuration reset to defaults");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get_settings() {
        let mut config = CliConfig::default();
        set_value(&mut config, "default", "settings.listing_debounce_ms", "250").unwrap();
        set_value(&mut config, "default", "settings.output_format", "JSON").unwrap();

        assert_eq!(config.settings.listing_debounce_ms, 250);
        assert_eq!(
            get_value(&config, "default", "settings.output_format").unwrap(),
            "json"
        );
    }

    #[test]
    fn test_bare_field_targets_active_profile() {
        let mut config = CliConfig::default();
        set_value(&mut config, "work", "blob_url", "https://blob.example").unwrap();

        assert_eq!(
            config.profiles["work"].blob_url.as_deref(),
            Some("https://blob.example")
        );
        assert_eq!(
            get_value(&config, "work", "profile.work.blob_url").unwrap(),
            "https://blob.example"
        );

        set_value(&mut config, "work", "profile.work.blob_url", "").unwrap();
        assert_eq!(config.profiles["work"].blob_url, None);
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        let mut config = CliConfig::default();
        assert!(set_value(&mut config, "default", "settings.colour", "true").is_err());
        assert!(set_value(&mut config, "default", "settings.color", "yes").is_err());
        assert!(set_value(&mut config, "default", "output_format", "xml").is_err());
        assert!(get_value(&config, "default", "profile.missing.api_url").is_err());
    }

    #[test]
    fn test_missing_profile_reads_defaults() {
        let config = CliConfig::default();
        assert_eq!(
            get_value(&config, "default", "api_url").unwrap(),
            crate::config::DEFAULT_API_URL
        );
        assert_eq!(get_value(&config, "default", "default_profile").unwrap(), "not set");
    }
}
