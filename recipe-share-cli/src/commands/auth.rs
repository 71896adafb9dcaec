//! Authentication commands
//!
//! The CLI signs in with the session cookie of a browser session. The token
//! is checked against the session endpoint before it is stored.

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use dialoguer::Password;
use recipe_share_core::Session;
use recipe_share_sdk::{RecipeShareClient, SdkConfig};
use std::time::Duration;
use tracing::debug;

use crate::config::{keyring_entry, AuthMethod, ProfileCredentials};
use crate::context::Context;
use crate::output::finish;

/// Authentication management commands
#[derive(Debug, Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthSubcommand {
    /// Sign in with a session token
    Login {
        /// Value of the session cookie (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// Use system keyring for secure storage
        #[arg(long)]
        use_keyring: bool,
    },

    /// Sign out and forget the stored token
    Logout {
        /// Clear all profiles
        #[arg(long)]
        all: bool,
    },

    /// Show where the token for the active profile is stored
    Status,

    /// Ask the server who the stored token belongs to
    Whoami,
}

/// Execute authentication commands
pub async fn execute(ctx: &Context, cmd: AuthCommands) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login { token, use_keyring } => login(ctx, token, use_keyring).await,
        AuthSubcommand::Logout { all } => logout(ctx, all),
        AuthSubcommand::Status => status(ctx),
        AuthSubcommand::Whoami => whoami(ctx).await,
    }
}

async fn verify(ctx: &Context, token: &str) -> Result<Session> {
    let config = SdkConfig::new(ctx.api_url())
        .with_session_token(token)
        .with_timeout(Duration::from_secs(ctx.settings.timeout_secs))
        .with_logging(ctx.verbose);
    let client = RecipeShareClient::new(config).context("Failed to create API client")?;

    let spinner = ctx.output.spinner("Checking session...");
    let session = client.auth().current().await;
    finish(spinner);

    match session.context("Could not reach the session endpoint")? {
        Some(session) => Ok(session),
        None => bail!("The server did not accept this session token"),
    }
}

async fn login(ctx: &Context, token: Option<String>, use_keyring: bool) -> Result<()> {
    let profile_name = ctx.active_profile();
    let token = match token {
        Some(token) => token,
        None => tokio::task::block_in_place(|| {
            Password::new()
                .with_prompt("Session token (the better-auth.session_token cookie)")
                .interact()
        })
        .context("Failed to read session token")?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        bail!("Session token cannot be empty");
    }

    let session = verify(ctx, &token).await?;

    let mut config = ctx.config.clone();
    let mut credentials = ctx.credentials.clone();

    if use_keyring {
        keyring_entry(profile_name)
            .and_then(|entry| entry.set_password(&token))
            .context("Failed to store session token in keyring")?;
        credentials.remove(profile_name);
        ctx.output.success("Session token stored in system keyring");
    } else {
        credentials.set(profile_name, ProfileCredentials::session_token(token));
        ctx.output.success("Session token stored in credentials file");
    }

    let profile = config.get_or_create_profile(profile_name);
    profile.auth = AuthMethod::SessionToken {
        token: String::new(),
        use_keyring,
    };
    if profile.api_url.is_none() {
        profile.api_url = Some(ctx.api_url().to_string());
    }

    if config.default_profile.is_none() {
        config.set_default_profile(profile_name);
        ctx.output
            .info(&format!("Set '{}' as default profile", profile_name));
    }

    config.save().context("Failed to save configuration")?;
    credentials.save().context("Failed to save credentials")?;

    ctx.output.success(&format!(
        "Signed in as {} on profile '{}'",
        signed_in_name(&session),
        profile_name
    ));
    Ok(())
}

fn signed_in_name(session: &Session) -> String {
    match session.user.display_name() {
        "" => session.user.id.to_string(),
        name => name.to_string(),
    }
}

fn logout(ctx: &Context, all: bool) -> Result<()> {
    let mut credentials = ctx.credentials.clone();
    let mut config = ctx.config.clone();

    let names: Vec<String> = if all {
        let mut names: Vec<String> = config.list_profiles().into_iter().map(String::from).collect();
        names.extend(credentials.profiles.keys().cloned());
        names.sort();
        names.dedup();
        names
    } else {
        vec![ctx.active_profile().to_string()]
    };

    for name in &names {
        credentials.remove(name);
        clear_keyring_entry(name);
        if let Some(profile) = config.profiles.get_mut(name) {
            profile.auth = AuthMethod::None;
        }
    }

    credentials.save().context("Failed to save credentials")?;
    config.save().context("Failed to save configuration")?;

    if all {
        ctx.output.success("Signed out of all profiles");
    } else {
        ctx.output
            .success(&format!("Signed out of profile '{}'", ctx.active_profile()));
    }
    Ok(())
}

fn clear_keyring_entry(profile: &str) {
    if let Err(e) = keyring_entry(profile).and_then(|entry| entry.delete_credential()) {
        debug!(profile, error = %e, "No keyring entry removed");
    }
}

fn status(ctx: &Context) -> Result<()> {
    let profile_name = ctx.active_profile();
    println!("Profile: {}", profile_name);
    println!("API URL: {}", ctx.api_url());

    if ctx.session_token_override.is_some() {
        println!("Auth: Session token from command line or environment");
    } else if ctx
        .credentials
        .get(profile_name)
        .and_then(|c| c.session_token.as_ref())
        .is_some()
    {
        println!("Auth: Session token (stored in credentials file)");
    } else {
        match &ctx.profile.auth {
            AuthMethod::None => println!("Auth: Not signed in"),
            AuthMethod::SessionToken { use_keyring: true, .. } => {
                println!("Auth: Session token (stored in keyring)")
            }
            AuthMethod::SessionToken { token, .. } if !token.is_empty() => {
                println!("Auth: Session token (stored in config file)")
            }
            AuthMethod::SessionToken { .. } => println!("Auth: Not signed in"),
        }
    }

    if ctx.config.default_profile.as_deref() == Some(profile_name) {
        println!("Default: Yes");
    }
    Ok(())
}

async fn whoami(ctx: &Context) -> Result<()> {
    let Some(token) = ctx.session_token()? else {
        ctx.output
            .info("Browsing anonymously. Run 'recipe-share auth login' to sign in.");
        return Ok(());
    };

    let session = verify(ctx, &token).await?;
    ctx.output
        .success(&format!("Signed in as {}", signed_in_name(&session)));
    ctx.output.info(&format!("User id: {}", session.user.id));
    ctx.output.info(&format!("Connected to: {}", ctx.api_url()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_share_core::UserSummary;

    #[test]
    fn test_signed_in_name_falls_back_to_id() {
        let mut session = Session {
            user: UserSummary {
                id: "u-42".into(),
                name: None,
                image: None,
            },
        };
        assert_eq!(signed_in_name(&session), "u-42");

        session.user.name = Some("Marija".to_string());
        assert_eq!(signed_in_name(&session), "Marija");
    }
}
