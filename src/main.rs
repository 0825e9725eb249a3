use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bowo::cli;
use bowo::cli::admin::AdminCommands;

#[derive(Parser)]
#[command(name = "bowo")]
#[command(about = "BoWo - skateboarding trick progression backend")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.bowo/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the level curve, or the level reached with some XP
    Levels {
        #[arg(long)]
        xp: Option<i64>,
    },

    /// Maintenance on stored user progress
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Serve { port }) => {
            cli::serve::serve_command(config_path, port).await?;
        }
        Some(Commands::Init { force }) => {
            cli::init::init_command(cli.config.clone(), force)?;
        }
        Some(Commands::Levels { xp }) => {
            cli::levels::levels_command(xp);
        }
        Some(Commands::Admin { command }) => {
            cli::admin::admin_command(config_path, command)?;
        }
        None => {
            // Default: serve
            cli::serve::serve_command(config_path, None).await?;
        }
    }

    Ok(())
}
