//! CLI execution context

use anyhow::{Context as _, Result};
use recipe_share_core::SessionContext;
use recipe_share_sdk::{AuthConfig, BlobImageStore, RecipeShareClient, SdkConfig};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::config::{keyring_entry, AuthMethod, CliConfig, Credentials, Profile, Settings};
use crate::output::{OutputFormat, OutputWriter};

/// Profile used when none is named and no default is set
pub const DEFAULT_PROFILE: &str = "default";

/// Execution context for CLI commands
pub struct Context {
    pub config: CliConfig,
    pub credentials: Credentials,
    pub profile_name: Option<String>,
    pub profile: Profile,
    /// Config file settings with environment overrides applied
    pub settings: Settings,
    pub output: OutputWriter,
    pub verbose: bool,
    pub api_url_override: Option<String>,
    pub session_token_override: Option<String>,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable configuration");
            CliConfig::default()
        });
        let credentials = Credentials::load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable credentials");
            Credentials::default()
        });
        let settings = config.settings.with_env_overrides()?;

        let profile_name = cli
            .profile
            .clone()
            .or_else(|| config.default_profile.clone());
        let profile = config
            .get_profile(profile_name.as_deref())
            .cloned()
            .unwrap_or_default();

        let output_format = cli
            .output
            .or_else(|| profile.output_format.as_deref().and_then(|f| f.parse().ok()))
            .or_else(|| settings.output_format.parse().ok())
            .unwrap_or(OutputFormat::Table);
        let output = OutputWriter::new(output_format, cli.no_color || !settings.color);

        Ok(Self {
            config,
            credentials,
            profile_name,
            profile,
            verbose: cli.verbose || settings.verbose,
            settings,
            output,
            api_url_override: cli.api_url.clone(),
            session_token_override: cli.session_token.clone(),
        })
    }

    pub fn active_profile(&self) -> &str {
        self.profile_name.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    /// Get the effective API URL
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or_else(|| self.profile.api_url())
    }

    /// The session token, looked up in override, credentials file, profile
    /// and keyring order
    pub fn session_token(&self) -> Result<Option<String>> {
        if let Some(token) = &self.session_token_override {
            return Ok(Some(token.clone()));
        }

        let profile_name = self.active_profile();
        if let Some(token) = self
            .credentials
            .get(profile_name)
            .and_then(|c| c.session_token.clone())
        {
            return Ok(Some(token));
        }

        match &self.profile.auth {
            AuthMethod::None => Ok(None),
            AuthMethod::SessionToken {
                use_keyring: true, ..
            } => {
                let entry = keyring_entry(profile_name).context("Failed to access keyring")?;
                let token = entry.get_password().context(
                    "Session token not found in keyring. Run 'recipe-share auth login' to sign in.",
                )?;
                debug!(profile = profile_name, "Using session token from keyring");
                Ok(Some(token))
            }
            AuthMethod::SessionToken { token, .. } if !token.is_empty() => Ok(Some(token.clone())),
            AuthMethod::SessionToken { .. } => Ok(None),
        }
    }

    pub fn auth_config(&self) -> Result<AuthConfig> {
        Ok(match self.session_token()? {
            Some(token) => AuthConfig::SessionToken(token),
            None => AuthConfig::None,
        })
    }

    pub fn listing_debounce(&self) -> Duration {
        Duration::from_millis(self.settings.listing_debounce_ms)
    }

    pub fn sdk_config(&self) -> Result<SdkConfig> {
        let mut config = SdkConfig::new(self.api_url())
            .with_auth(self.auth_config()?)
            .with_timeout(Duration::from_secs(self.settings.timeout_secs))
            .with_max_retries(self.settings.max_retries)
            .with_listing_debounce(self.listing_debounce())
            .with_logging(self.verbose);

        if let Some(blob_url) = &self.profile.blob_url {
            config = config.with_blob_base_url(blob_url.clone());
        }
        for (name, value) in &self.profile.headers {
            config = config.with_header(name.clone(), value.clone());
        }
        Ok(config)
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<RecipeShareClient> {
        RecipeShareClient::new(self.sdk_config()?).context("Failed to create API client")
    }

    /// Client for the listing page, which surfaces failures instead of retrying
    pub fn listing_client(&self) -> Result<RecipeShareClient> {
        RecipeShareClient::new(self.sdk_config()?.with_max_retries(0))
            .context("Failed to create API client")
    }

    /// Image store of the active profile, if one is configured
    pub fn image_store(&self) -> Result<Option<BlobImageStore>> {
        BlobImageStore::from_config(&self.sdk_config()?).context("Invalid image store URL")
    }

    /// Resolve the viewer. Any failure means browsing anonymously.
    pub async fn session_context(&self, client: &RecipeShareClient) -> SessionContext {
        if !client.config().auth.is_configured() {
            return SessionContext::anonymous();
        }
        match client.auth().context().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Could not resolve session, continuing anonymously");
                SessionContext::anonymous()
            }
        }
    }
}
