//! Reward use cases
//!
//! Each public method is a transaction script over one user's progress
//! document: load, `ensure_fresh`, mutate, save. There is no locking across
//! requests; concurrent writers for the same user are last-write-wins.

mod answers;
mod catalog;
mod clock;
mod cosmetics;
mod dto;
mod progress;
mod unlocks;

pub use catalog::list_levels;
pub use clock::{Clock, SystemClock};
pub use dto::{
    AliveDeckEntry, AliveDeckList, AliveDeckUnlock, AnswerResult, BadgeEntry, BubbleChoice,
    BubbleList, DailyProgressResult, LevelEntry, MiniGameUnlock, NextQuestion, QuizDto,
    QuizValidation, ShopItem, ShopList, ShopPurchase, TrickEntry, TrickUnlockResult,
    UserProgressDto,
};

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::ProgressionSettings;
use crate::content::{ContentCatalog, Trick};
use crate::error::{BowoError, BowoResult};
use crate::progression::decks::{compute_available_tokens, sanitize};
use crate::progression::mini_games::available_slots;
use crate::progression::{apply_xp, ensure_fresh, Freshness, LevelInfo, UserProgress, XpGrant};
use crate::store::ProgressStore;

/// Entry point for every progress operation
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
    content: Arc<ContentCatalog>,
    settings: ProgressionSettings,
    clock: Arc<dyn Clock>,
}

impl ProgressService {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        content: Arc<ContentCatalog>,
        settings: ProgressionSettings,
    ) -> Self {
        Self {
            store,
            content,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn content(&self) -> &ContentCatalog {
        &self.content
    }

    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Stored document, or a default one for a first-time user
    fn load(&self, user_id: &str) -> BowoResult<UserProgress> {
        Ok(self.store.load_progress(user_id)?.unwrap_or_default())
    }

    /// Load and bring the per-day state up to today
    fn load_fresh(&self, user_id: &str) -> BowoResult<(UserProgress, Freshness)> {
        let mut progress = self.load(user_id)?;
        let freshness = ensure_fresh(&mut progress, self.today(), self.settings.xp_per_coin);
        Ok((progress, freshness))
    }

    fn save(&self, user_id: &str, progress: &UserProgress) -> BowoResult<()> {
        self.store.save_progress(user_id, progress)
    }

    /// Persist only if `ensure_fresh` changed something
    fn save_if_fresh(
        &self,
        user_id: &str,
        progress: &UserProgress,
        freshness: &Freshness,
    ) -> BowoResult<()> {
        if freshness.changed() {
            self.save(user_id, progress)?;
        }
        Ok(())
    }

    fn credit(&self, progress: &mut UserProgress, amount: u64) -> XpGrant {
        apply_xp(progress, amount, self.settings.xp_per_coin)
    }

    fn require_trick(&self, trick_id: &str) -> BowoResult<&Trick> {
        self.content
            .tricks
            .get(trick_id)
            .ok_or_else(|| BowoError::not_found(format!("trick '{trick_id}'")))
    }

    fn to_dto(&self, mut progress: UserProgress) -> UserProgressDto {
        let xp = i64::try_from(progress.xp).unwrap_or(i64::MAX);
        let level = LevelInfo::compute(xp);
        let available_alive_tokens =
            compute_available_tokens(&progress, self.settings.xp_per_alive_token);
        let available_mini_game_slots =
            available_slots(&progress, self.settings.tricks_per_mini_game);
        let daily_unlocks_remaining = self
            .settings
            .daily_unlock_limit
            .saturating_sub(progress.tricks_unlocked_today);
        progress.unlocked_alive_decks = sanitize(&progress.unlocked_alive_decks);

        UserProgressDto {
            progress,
            level,
            available_alive_tokens,
            available_mini_game_slots,
            daily_unlocks_remaining,
        }
    }
}
