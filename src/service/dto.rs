//! Response shapes of the use cases, serialized camelCase for the mobile client

use serde::Serialize;

use crate::content::{QuestionView, QuizView, Trick};
use crate::progression::decks::AliveFamily;
use crate::progression::avatars::ShopFamily;
use crate::progression::{BadgeCategory, LevelInfo, StreakChange, UserProgress};

/// Progress document plus everything derived from it on read
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgressDto {
    #[serde(flatten)]
    pub progress: UserProgress,
    pub level: LevelInfo,
    pub available_alive_tokens: u64,
    pub available_mini_game_slots: u64,
    pub daily_unlocks_remaining: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgressResult {
    /// False when today was already counted
    pub rolled_over: bool,
    pub streak: u32,
    pub streak_change: Option<StreakChange>,
    pub badges: Vec<&'static str>,
    pub bonus_xp: u64,
    pub progress: UserProgressDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickUnlockResult {
    pub trick_id: String,
    pub already_unlocked: bool,
    pub tricks_unlocked_today: u32,
    pub daily_limit: u32,
    pub xp_gained: u64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    #[serde(flatten)]
    pub quiz: QuizView,
    pub attempts: u32,
    pub already_unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizValidation {
    pub trick_id: String,
    pub correct: bool,
    pub already_unlocked: bool,
    /// Wrong answers recorded for this trick so far
    pub attempts: u32,
    pub xp_gained: u64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestion {
    pub trick_id: String,
    pub current_level: u8,
    pub is_completed: bool,
    pub question: Option<QuestionView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub correct: bool,
    pub previous_level: u8,
    pub new_level: u8,
    /// Set when a correct answer skipped ahead or fell behind
    pub expected_level: Option<u8>,
    /// XP actually persisted by this answer
    pub xp_gained: u64,
    /// True only on the answer that reached mastery
    pub mastered: bool,
    pub already_mastered: bool,
    pub deck_unlocked: Option<&'static str>,
    pub badges: Vec<&'static str>,
    pub global_progress: UserProgressDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliveDeckEntry {
    pub id: &'static str,
    pub family: AliveFamily,
    pub owned: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliveDeckList {
    pub decks: Vec<AliveDeckEntry>,
    pub owned: Vec<String>,
    pub available_tokens: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliveDeckUnlock {
    pub deck_id: String,
    pub already_owned: bool,
    pub available_tokens: u64,
    pub xp_gained: u64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleList {
    pub offered: Vec<&'static str>,
    pub chosen: Option<String>,
    pub level: u32,
    pub min_level: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleChoice {
    pub bubble_avatar_id: String,
    pub already_chosen: bool,
    pub xp_gained: u64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: String,
    pub family: ShopFamily,
    pub price: u64,
    pub owned: bool,
    pub equipped: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopList {
    pub coins: u64,
    pub shape_avatar_id: Option<String>,
    pub items: Vec<ShopItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPurchase {
    pub shape_id: String,
    pub already_owned: bool,
    pub coins_spent: u64,
    pub coins_left: u64,
    pub xp_gained: u64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameUnlock {
    pub key: String,
    pub already_unlocked: bool,
    pub available_slots: u64,
    pub xp_gained: u64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickEntry {
    #[serde(flatten)]
    pub trick: Trick,
    pub starter: bool,
    pub unlocked: bool,
    pub mastered: bool,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub xp_reward: u64,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelEntry {
    pub level: u32,
    pub xp_required: u64,
    pub emoji: &'static str,
    pub title: &'static str,
}
