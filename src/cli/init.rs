//! Init command implementation

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::config::Config;

/// Default configuration written by `bowo init`
pub const DEFAULT_CONFIG: &str = r#"# BoWo configuration
# ==================
#
# Every key is optional; removing a line falls back to the value shown here.

# ============================================================================
# SERVER - HTTP API for the mobile app
# ============================================================================

[server]
bind = "127.0.0.1"
port = 5080
# Worker threads answering requests
workers = 4
# Larger request bodies are rejected with 413
max_body_bytes = 65536

# ============================================================================
# STORAGE
# ============================================================================

[storage]
# Empty: ~/.bowo/bowo.db
db_path = ""

# ============================================================================
# CONTENT - tricks, mastery questions, unlock quizzes
# ============================================================================
#
# Empty paths use the content built into the binary.

[content]
tricks_path = ""
questions_path = ""
quizzes_path = ""

# ============================================================================
# PROGRESSION - reward tuning
# ============================================================================

[progression]
# Free trick unlocks per UTC day
daily_unlock_limit = 3
# XP for unlocking a trick through the daily quota, an ad or a purchase
unlock_xp = 120
# XP for a correct mastery answer given in order
answer_xp = 20
# XP for unlocking a trick by passing its quiz
quiz_unlock_xp = 50
# One alive-deck token per this much XP
xp_per_alive_token = 1000
# One mini-game slot per this many unlocked tricks
tricks_per_mini_game = 2
# One coin per this much XP
xp_per_coin = 10
# Level from which a bubble avatar can be picked
bubble_min_level = 2

# ============================================================================
# AUTH
# ============================================================================

[auth]
access_ttl_minutes = 60
refresh_ttl_days = 30
min_password_len = 8
"#;

/// Write the default config to `config_path` (or ~/.bowo/config.toml)
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    Config::write_locked(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_command(Some(path.clone()), false).unwrap();
        assert!(init_command(Some(path.clone()), false).is_err());
        assert!(init_command(Some(path.clone()), true).is_ok());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
