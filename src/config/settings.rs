//! Settings sections of the configuration file

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::progression::XpRewards;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind, default: 127.0.0.1
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port for the mobile client API, default: 5080
    #[serde(default = "default_port")]
    pub port: u16,

    /// Worker threads pulling requests off the listener
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Request bodies above this size are rejected with 413
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5080
}

fn default_workers() -> usize {
    4
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            workers: default_workers(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database path. Empty means ~/.bowo/bowo.db
    #[serde(default)]
    pub db_path: String,
}

impl StorageSettings {
    pub fn resolved_db_path(&self) -> PathBuf {
        if self.db_path.trim().is_empty() {
            super::Config::global_config_dir().join("bowo.db")
        } else {
            PathBuf::from(&self.db_path)
        }
    }
}

/// Content override files. Empty paths use the data embedded in the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default)]
    pub tricks_path: String,
    #[serde(default)]
    pub questions_path: String,
    #[serde(default)]
    pub quizzes_path: String,
}

/// Reward tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionSettings {
    /// Free trick unlocks per UTC day
    #[serde(default = "default_daily_unlock_limit")]
    pub daily_unlock_limit: u32,

    #[serde(default = "default_unlock_xp")]
    pub unlock_xp: u64,

    /// XP for a correct, in-order mastery answer
    #[serde(default = "default_answer_xp")]
    pub answer_xp: u64,

    #[serde(default = "default_quiz_unlock_xp")]
    pub quiz_unlock_xp: u64,

    /// XP per alive-deck token
    #[serde(default = "default_xp_per_alive_token")]
    pub xp_per_alive_token: u64,

    /// Unlocked tricks per mini-game slot
    #[serde(default = "default_tricks_per_mini_game")]
    pub tricks_per_mini_game: u32,

    /// XP per coin credited
    #[serde(default = "default_xp_per_coin")]
    pub xp_per_coin: u64,

    /// Level from which a bubble avatar can be picked
    #[serde(default = "default_bubble_min_level")]
    pub bubble_min_level: u32,
}

fn default_daily_unlock_limit() -> u32 {
    3
}

fn default_unlock_xp() -> u64 {
    XpRewards::TRICK_UNLOCK
}

fn default_answer_xp() -> u64 {
    XpRewards::CORRECT_ANSWER
}

fn default_quiz_unlock_xp() -> u64 {
    XpRewards::QUIZ_UNLOCK
}

fn default_xp_per_alive_token() -> u64 {
    1000
}

fn default_tricks_per_mini_game() -> u32 {
    2
}

fn default_xp_per_coin() -> u64 {
    10
}

fn default_bubble_min_level() -> u32 {
    2
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            daily_unlock_limit: default_daily_unlock_limit(),
            unlock_xp: default_unlock_xp(),
            answer_xp: default_answer_xp(),
            quiz_unlock_xp: default_quiz_unlock_xp(),
            xp_per_alive_token: default_xp_per_alive_token(),
            tricks_per_mini_game: default_tricks_per_mini_game(),
            xp_per_coin: default_xp_per_coin(),
            bubble_min_level: default_bubble_min_level(),
        }
    }
}

/// Account and session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,

    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,

    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_access_ttl_minutes() -> i64 {
    60
}

fn default_refresh_ttl_days() -> i64 {
    30
}

fn default_min_password_len() -> usize {
    8
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_days: default_refresh_ttl_days(),
            min_password_len: default_min_password_len(),
        }
    }
}
