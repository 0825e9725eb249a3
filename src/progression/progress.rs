//! Per-user progress aggregate and per-trick progress record
//!
//! `UserProgress` is the single document every reward use case reads,
//! mutates and writes back. It is created default-valued on first access.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::mastery::TrickLevel;

/// Mutable progress document for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    /// Cumulative experience; only lowered by an admin reset
    pub xp: u64,
    /// Shop currency, credited alongside XP
    pub coins: u64,
    pub unlocked_tricks: BTreeSet<String>,
    pub tricks_unlocked_today: u32,
    pub last_unlock_date_utc: Option<NaiveDate>,
    /// Wrong quiz answers per trick
    pub quiz_attempts: BTreeMap<String, u32>,
    pub daily_streak: u32,
    pub last_activity_date_utc: Option<NaiveDate>,
    /// Append-only
    pub unlocked_badges: BTreeSet<String>,
    pub unlocked_decks: BTreeSet<String>,
    /// Ordered by unlock; may hold stale ids from older catalogs, see `decks::sanitize`
    #[serde(deserialize_with = "non_null_ids")]
    pub unlocked_alive_decks: Vec<String>,
    pub mastered_tricks: BTreeSet<String>,
    pub bubble_avatar_id: Option<String>,
    pub shape_avatar_id: Option<String>,
    pub unlocked_shape_avatar_ids: BTreeSet<String>,
    pub unlocked_mini_games: BTreeSet<String>,
    pub questions_answered_today: u32,
    pub xp_gained_today: u64,
}

impl UserProgress {
    pub fn is_trick_unlocked(&self, trick_id: &str) -> bool {
        self.unlocked_tricks.contains(trick_id)
    }

    /// Add a trick to the unlocked set. Returns false if it was already there.
    pub fn unlock_trick(&mut self, trick_id: &str) -> bool {
        self.unlocked_tricks.insert(trick_id.to_string())
    }

    /// Zero the daily unlock counter when its unlocks happened before `today`.
    ///
    /// `last_unlock_date_utc` keeps the day of the last quota unlock; only an
    /// unlock moves it. Returns true if the counter was reset.
    pub fn reset_unlock_counter_if_stale(&mut self, today: NaiveDate) -> bool {
        if self.tricks_unlocked_today == 0 || self.last_unlock_date_utc == Some(today) {
            return false;
        }
        self.tricks_unlocked_today = 0;
        true
    }

    /// Record a wrong quiz answer and return the new attempt count
    pub fn record_quiz_miss(&mut self, trick_id: &str) -> u32 {
        let attempts = self.quiz_attempts.entry(trick_id.to_string()).or_insert(0);
        *attempts += 1;
        *attempts
    }
}

/// Accepts `null` entries left by older clients and drops them.
fn non_null_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

/// Stored progress for one (user, trick) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTrickProgress {
    pub trick_id: String,
    pub level: TrickLevel,
    pub last_question_at: Option<DateTime<Utc>>,
}

impl UserTrickProgress {
    pub fn new(trick_id: &str) -> Self {
        Self {
            trick_id: trick_id.to_string(),
            level: TrickLevel::UNTOUCHED,
            last_question_at: None,
        }
    }
}
