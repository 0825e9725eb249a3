//! Reading progress, the daily rollover, XP grants and admin resets

use tracing::info;

use super::{DailyProgressResult, ProgressService, UserProgressDto};
use crate::error::{BowoError, BowoResult};
use crate::progression::{update_daily_progress, UserProgress, XpGrant};

impl ProgressService {
    /// Full progress of a user. Applies the daily reset first and persists it.
    pub fn get_progress(&self, user_id: &str) -> BowoResult<UserProgressDto> {
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;
        Ok(self.to_dto(progress))
    }

    /// Run the streak rollover for today. A second call on the same day is a no-op.
    pub fn update_daily(&self, user_id: &str) -> BowoResult<DailyProgressResult> {
        let today = self.today();
        let mut progress = self.load(user_id)?;
        let counter_reset = progress.reset_unlock_counter_if_stale(today);
        let rollover = update_daily_progress(&mut progress, today, self.settings.xp_per_coin);

        if counter_reset || rollover.is_some() {
            self.save(user_id, &progress)?;
        }

        let (streak_change, badges, bonus_xp) = match rollover {
            Some(r) => {
                let bonus = r.bonus.as_ref().map(XpGrant::total_xp).unwrap_or(0);
                if !r.badges.is_empty() {
                    info!(
                        "[bowo:progress] {} reached a {}-day streak, badges {:?}",
                        user_id, r.streak.current, r.badges
                    );
                }
                (Some(r.streak), r.badges, bonus)
            }
            None => (None, Vec::new(), 0),
        };

        Ok(DailyProgressResult {
            rolled_over: streak_change.is_some(),
            streak: progress.daily_streak,
            streak_change,
            badges,
            bonus_xp,
            progress: self.to_dto(progress),
        })
    }

    /// Add XP through the standard path and persist it as its own write
    pub fn grant_xp(&self, user_id: &str, amount: u64) -> BowoResult<XpGrant> {
        let (mut progress, _) = self.load_fresh(user_id)?;
        let grant = self.credit(&mut progress, amount);
        self.save(user_id, &progress)?;

        if grant.leveled_up() {
            info!(
                "[bowo:progress] {} leveled up {} -> {}",
                user_id, grant.level_before, grant.level_after
            );
        }
        Ok(grant)
    }

    /// Stored document as-is, without the daily reset
    pub fn raw_progress(&self, user_id: &str) -> BowoResult<Option<UserProgress>> {
        self.store.load_progress(user_id)
    }

    /// Set XP and the daily counters to zero. Badges, unlocks and coins stay.
    pub fn admin_reset_xp(&self, user_id: &str) -> BowoResult<UserProgressDto> {
        let mut progress = self
            .store
            .load_progress(user_id)?
            .ok_or_else(|| BowoError::not_found(format!("progress of '{user_id}'")))?;

        progress.xp = 0;
        progress.xp_gained_today = 0;
        progress.questions_answered_today = 0;
        self.save(user_id, &progress)?;

        info!("[bowo:progress] Admin reset XP of {}", user_id);
        Ok(self.to_dto(progress))
    }

    /// Clear wrong-answer counters, for one trick or all. Returns how many were cleared.
    pub fn admin_reset_quiz(&self, user_id: &str, trick_id: Option<&str>) -> BowoResult<usize> {
        let mut progress = self
            .store
            .load_progress(user_id)?
            .ok_or_else(|| BowoError::not_found(format!("progress of '{user_id}'")))?;

        let cleared = match trick_id {
            Some(trick_id) => usize::from(progress.quiz_attempts.remove(trick_id).is_some()),
            None => std::mem::take(&mut progress.quiz_attempts).len(),
        };
        self.save(user_id, &progress)?;

        info!("[bowo:progress] Admin cleared {} quiz counters of {}", cleared, user_id);
        Ok(cleared)
    }
}
