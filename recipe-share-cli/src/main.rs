use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod views;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&ctx, cli.command).await {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

// Logs go to stderr so JSON and YAML output stay clean
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "recipe_share=debug"
    } else {
        "recipe_share=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .init();
}

async fn run(ctx: &Context, command: Commands) -> Result<()> {
    tracing::debug!(api_url = ctx.api_url(), profile = ctx.active_profile(), "Running command");

    match command {
        Commands::Recipes(cmd) => commands::recipes::execute(ctx, cmd).await,
        Commands::Taxonomy(cmd) => commands::taxonomy::execute(ctx, cmd).await,
        Commands::Auth(cmd) => commands::auth::execute(ctx, cmd).await,
        Commands::Config(cmd) => commands::config::execute(ctx, cmd).await,
    }
}
