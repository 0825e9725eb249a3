//! Admin commands: reset XP, reset quiz counters, show a progress document

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::{load_config, open_services};

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommands {
    /// Set a user's XP and daily counters to zero (badges and unlocks are kept)
    ResetXp {
        #[arg(long)]
        user: String,
    },

    /// Clear a user's wrong quiz answer counters
    ResetQuiz {
        #[arg(long)]
        user: String,

        /// Only this trick (all tricks if omitted)
        #[arg(long)]
        trick: Option<String>,
    },

    /// Print a user's stored progress document
    Show {
        #[arg(long)]
        user: String,
    },
}

pub fn admin_command(config_path: Option<&Path>, command: AdminCommands) -> Result<()> {
    let config = load_config(config_path)?;
    let (_db, progress) = open_services(&config)?;

    match command {
        AdminCommands::ResetXp { user } => {
            let dto = progress.admin_reset_xp(&user)?;
            println!(
                "Reset XP of {} (level {}, {} badges kept)",
                user,
                dto.level.level,
                dto.progress.unlocked_badges.len()
            );
        }
        AdminCommands::ResetQuiz { user, trick } => {
            let cleared = progress.admin_reset_quiz(&user, trick.as_deref())?;
            println!("Cleared {} quiz counter(s) of {}", cleared, user);
        }
        AdminCommands::Show { user } => match progress.raw_progress(&user)? {
            Some(doc) => {
                let json = serde_json::to_string_pretty(&doc)
                    .context("Failed to encode progress document")?;
                println!("{json}");
            }
            None => println!("No progress stored for {}", user),
        },
    }
    Ok(())
}
