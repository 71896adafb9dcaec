//! Command-line arguments

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommands;
use crate::commands::config::ConfigCommands;
use crate::commands::recipes::RecipesCommands;
use crate::commands::taxonomy::TaxonomyCommands;
use crate::output::OutputFormat;

/// Browse, review and share recipes from the terminal
#[derive(Debug, Parser)]
#[command(name = "recipe-share", version, about, long_about = None)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(short, long, global = true, env = "RECIPE_SHARE_PROFILE")]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Debug logging and request tracing
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API base URL, overriding the profile
    #[arg(long, global = true, env = "RECIPE_SHARE_API_URL")]
    pub api_url: Option<String>,

    /// Session token, overriding stored credentials
    #[arg(long, global = true, env = "RECIPE_SHARE_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find, read, review and publish recipes
    Recipes(RecipesCommands),

    /// Categories, allergens and difficulty levels
    Taxonomy(TaxonomyCommands),

    /// Sign in and out
    Auth(AuthCommands),

    /// Inspect and edit CLI configuration
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "recipe-share",
            "recipes",
            "list",
            "--vegan",
            "-o",
            "json",
            "--api-url",
            "http://localhost:4000",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:4000"));
        assert!(matches!(cli.command, Commands::Recipes(_)));
    }
}
