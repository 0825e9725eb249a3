//! Trick unlocking: daily quota, ad/purchase stubs and the quiz path

use tracing::{info, warn};

use super::{ProgressService, QuizDto, QuizValidation, TrickUnlockResult};
use crate::error::{BowoError, BowoResult};
use crate::progression::badges::{unlock_all, unlock_badges, BadgeRewards};
use crate::progression::BadgeId;

impl ProgressService {
    /// Unlock a trick against the daily quota.
    ///
    /// An already unlocked trick is an idempotent success that does not touch
    /// the quota.
    pub fn unlock_trick(&self, user_id: &str, trick_id: &str) -> BowoResult<TrickUnlockResult> {
        self.require_trick(trick_id)?;
        let limit = self.settings.daily_unlock_limit;
        let (mut progress, freshness) = self.load_fresh(user_id)?;

        if progress.is_trick_unlocked(trick_id) {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Ok(TrickUnlockResult {
                trick_id: trick_id.to_string(),
                already_unlocked: true,
                tricks_unlocked_today: progress.tricks_unlocked_today,
                daily_limit: limit,
                xp_gained: 0,
                badges: Vec::new(),
            });
        }

        if progress.tricks_unlocked_today >= limit {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            warn!("[bowo:progress] {} hit the daily unlock limit on '{}'", user_id, trick_id);
            return Err(BowoError::DailyLimitReached { limit });
        }

        progress.unlock_trick(trick_id);
        progress.tricks_unlocked_today += 1;
        progress.last_unlock_date_utc = Some(self.today());

        let unlocked = progress.unlocked_tricks.len();
        let rewards = unlock_all(&mut progress, &unlock_badges(unlocked));
        let grant = self.credit(&mut progress, self.settings.unlock_xp + rewards.xp);
        self.save(user_id, &progress)?;

        info!(
            "[bowo:progress] {} unlocked '{}' ({}/{} today)",
            user_id, trick_id, progress.tricks_unlocked_today, limit
        );

        Ok(TrickUnlockResult {
            trick_id: trick_id.to_string(),
            already_unlocked: false,
            tricks_unlocked_today: progress.tricks_unlocked_today,
            daily_limit: limit,
            xp_gained: grant.total_xp(),
            badges: merged_badges(&rewards, &grant.badges),
        })
    }

    /// Rewarded-ad unlock. Any non-empty token is accepted.
    pub fn ad_reward(
        &self,
        user_id: &str,
        trick_id: &str,
        ad_token: &str,
    ) -> BowoResult<TrickUnlockResult> {
        require_token(ad_token, "adToken")?;
        warn!("[bowo:progress] Ad token for '{}' accepted without verification", trick_id);
        self.unlock_trick(user_id, trick_id)
    }

    /// In-app purchase unlock. Any non-empty receipt is accepted.
    pub fn validate_purchase(
        &self,
        user_id: &str,
        trick_id: &str,
        purchase_token: &str,
    ) -> BowoResult<TrickUnlockResult> {
        require_token(purchase_token, "purchaseToken")?;
        warn!(
            "[bowo:progress] Purchase token for '{}' accepted without verification",
            trick_id
        );
        self.unlock_trick(user_id, trick_id)
    }

    /// Quiz for a trick, answer key withheld
    pub fn get_quiz(&self, user_id: &str, trick_id: &str) -> BowoResult<QuizDto> {
        let quiz = self
            .content
            .quizzes
            .get(trick_id)
            .ok_or_else(|| BowoError::not_found(format!("quiz for '{trick_id}'")))?;
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;

        Ok(QuizDto {
            quiz: quiz.view(),
            attempts: progress.quiz_attempts.get(trick_id).copied().unwrap_or(0),
            already_unlocked: progress.is_trick_unlocked(trick_id),
        })
    }

    /// Check a quiz answer. A right answer unlocks the trick outside the daily
    /// quota; a wrong one is counted.
    pub fn validate_quiz(
        &self,
        user_id: &str,
        trick_id: &str,
        answer_index: usize,
    ) -> BowoResult<QuizValidation> {
        let quiz = self
            .content
            .quizzes
            .get(trick_id)
            .ok_or_else(|| BowoError::not_found(format!("quiz for '{trick_id}'")))?;
        let (mut progress, _) = self.load_fresh(user_id)?;

        let correct = quiz.is_correct(answer_index);
        let already_unlocked = progress.is_trick_unlocked(trick_id);
        let mut xp_gained = 0;
        let mut badges = Vec::new();

        if !correct {
            let attempts = progress.record_quiz_miss(trick_id);
            info!(
                "[bowo:progress] {} missed the '{}' quiz ({} attempts)",
                user_id, trick_id, attempts
            );
        } else if !already_unlocked {
            progress.unlock_trick(trick_id);

            let unlocked = progress.unlocked_tricks.len();
            let mut rewards = unlock_all(&mut progress, &[BadgeId::FirstQuizWin]);
            rewards.merge(unlock_all(&mut progress, &unlock_badges(unlocked)));
            let grant = self.credit(&mut progress, self.settings.quiz_unlock_xp + rewards.xp);
            xp_gained = grant.total_xp();
            badges = merged_badges(&rewards, &grant.badges);

            info!("[bowo:progress] {} unlocked '{}' through the quiz", user_id, trick_id);
        }
        self.save(user_id, &progress)?;

        Ok(QuizValidation {
            trick_id: trick_id.to_string(),
            correct,
            already_unlocked,
            attempts: progress.quiz_attempts.get(trick_id).copied().unwrap_or(0),
            xp_gained,
            badges,
        })
    }
}

fn require_token(token: &str, field: &str) -> BowoResult<()> {
    if token.trim().is_empty() {
        return Err(BowoError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(super) fn merged_badges(
    rewards: &BadgeRewards,
    level_badges: &[&'static str],
) -> Vec<&'static str> {
    let mut badges = rewards.ids();
    badges.extend(level_badges.iter().copied());
    badges
}
