mod context;
mod coverage;
mod render;
mod search;
mod shell;

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;
use crate::coverage::KeyCommands;
use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "covscan")]
#[command(about = "Find businesses within radio range of an antenna and check their internet coverage")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for businesses around a point
    Search(SearchArgs),
    /// Estimate the radio horizon for an antenna height
    Range {
        /// Antenna height above ground in meters
        #[arg(long)]
        height: String,
    },
    /// Check internet coverage for one address
    Classify {
        /// Street and house number
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
    },
    /// Look up a postal address for a business from a map search
    Locate {
        /// Business name
        #[arg(long)]
        name: String,
        /// Position as "lat, lon"
        #[arg(long, allow_hyphen_values = true)]
        coords: String,
    },
    /// Manage the scraping backend API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Start an interactive session
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = covscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Range needs no clients.
    if let Commands::Range { height } = &command {
        search::run_range(height);
        return Ok(());
    }

    let ctx = Arc::new(AppContext::from_config(config)?);
    let result = match command {
        Commands::Search(args) => search::run_search(&ctx, &args).await,
        Commands::Range { .. } => Ok(()),
        Commands::Classify { address, city } => {
            coverage::run_classify(&ctx.coverage, &address, &city).await
        }
        Commands::Locate { name, coords } => coverage::run_locate(&ctx.coverage, &name, &coords).await,
        Commands::Key { command } => coverage::run_key(&ctx.coverage, &command).await,
        Commands::Shell => shell::run_shell(Arc::clone(&ctx)).await,
    };

    if let Err(err) = &result {
        if err.downcast_ref::<covscan_core::ValidationError>().is_none() {
            tracing::error!(error = ?err, "command failed");
        }
    }
    result
}

#[cfg(test)]
mod tests;
