//! Profiles, settings and stored credentials
//!
//! `config.toml` and `credentials.toml` live in the platform config directory
//! (`~/.config/recipe-share-cli` on Linux).

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default API URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Prefix of environment variables overriding `[settings]`
pub const ENV_PREFIX: &str = "RECIPE_SHARE";

/// Keyring service name
pub const KEYRING_SERVICE: &str = "recipe-share-cli";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "recipe-share", "recipe-share-cli")
        .context("Could not determine config directory")
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Used when `--profile` is not given
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

        #[serde(default)]
    pub settings: Settings,
}

impl CliConfig {
    /// Read `config.toml`; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn credentials_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("credentials.toml"))
    }

    /// Get a profile by name, falling back to the default profile
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let profile_name = name.or(self.default_profile.as_deref())?;
        self.profiles.get(profile_name)
    }

    pub fn get_or_create_profile(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_default()
    }

    pub fn set_default_profile(&mut self, name: &str) {
        self.default_profile = Some(name.to_string());
    }

    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// Profile names, sorted
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// One server the CLI can talk to
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Profile {
    /// API base URL
    #[serde(default)]
    pub api_url: Option<String>,

    /// Object store endpoint for recipe images
    #[serde(default)]
    pub blob_url: Option<String>,

    #[serde(default)]
    pub auth: AuthMethod,

    /// Overrides `settings.output_format` for this profile
    #[serde(default)]
    pub output_format: Option<String>,

    /// Sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Profile {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

/// Where the session token lives
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// Browse anonymously
    #[default]
    None,
    /// Session cookie value copied from a signed-in browser
    SessionToken {
        /// Empty when the token is in the keyring or the credentials file
        #[serde(default)]
        token: String,
        #[serde(default)]
        use_keyring: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Default output format
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Same as passing `--verbose` every time
    #[serde(default)]
    pub verbose: bool,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for failed requests; the listing never retries regardless
    #[serde(default)]
    pub max_retries: u32,

    /// Quiet period before a filter change is fetched
    #[serde(default = "default_listing_debounce_ms")]
    pub listing_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            color: true,
            verbose: false,
            timeout_secs: default_timeout(),
            max_retries: 0,
            listing_debounce_ms: default_listing_debounce_ms(),
        }
    }
}

impl Settings {
    /// Layer `RECIPE_SHARE_*` environment variables over these settings,
    /// e.g. `RECIPE_SHARE_TIMEOUT_SECS=10`.
    pub fn with_env_overrides(&self) -> Result<Self> {
        self.layered(env_source())
    }

    pub fn layered(&self, env: config::Environment) -> Result<Self> {
        config::Config::builder()
            .add_source(config::Config::try_from(self).context("Failed to stage settings")?)
            .add_source(env)
            .build()
            .context("Failed to read environment overrides")?
            .try_deserialize()
            .context("Invalid environment override")
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .try_parsing(true)
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_listing_debounce_ms() -> u64 {
    500
}

/// Credential storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    pub profiles: HashMap<String, ProfileCredentials>,
}

impl Credentials {
    pub fn load() -> Result<Self> {
        Self::load_from(&CliConfig::credentials_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials from {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&CliConfig::credentials_path()?)
    }

    /// Write the file readable by the owner only
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create credentials directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize credentials")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write credentials to {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    pub fn get(&self, profile: &str) -> Option<&ProfileCredentials> {
        self.profiles.get(profile)
    }

    pub fn set(&mut self, profile: &str, creds: ProfileCredentials) {
        self.profiles.insert(profile.to_string(), creds);
    }

    pub fn remove(&mut self, profile: &str) -> Option<ProfileCredentials> {
        self.profiles.remove(profile)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileCredentials {
    pub session_token: Option<String>,
}

impl ProfileCredentials {
    pub fn session_token(token: impl Into<String>) -> Self {
        Self {
            session_token: Some(token.into()),
        }
    }
}

/// Keyring entry holding a profile's session token
pub fn keyring_entry(profile: &str) -> keyring::Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{}-session-token", profile))
}
