//! Trick mastery: next question and answer submission
//!
//! An answer is persisted in three separate writes, in this order: the trick
//! row, the progress document (counters, mastery, deck, badges), then the XP
//! grant. A failed XP write is logged and the answer still succeeds with
//! `xpGained = 0`. Nothing is retried or rolled back.

use tracing::{debug, info, warn};

use super::{AnswerResult, NextQuestion, ProgressService};
use crate::content::Trick;
use crate::error::{BowoError, BowoResult};
use crate::progression::badges::{mastery_badges, unlock_all, BadgeRewards};
use crate::progression::decks::draw_new;
use crate::progression::mastery::check_question_level;
use crate::progression::{HoldReason, Transition, UserProgress, UserTrickProgress};

impl ProgressService {
    /// Question for the user's next level on a trick, or `isCompleted` once mastered
    pub fn next_question(&self, user_id: &str, trick_id: &str) -> BowoResult<NextQuestion> {
        let trick = self.require_trick(trick_id)?;
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;
        require_access(&progress, trick)?;

        let stored = self
            .store
            .load_trick_progress(user_id, trick_id)?
            .unwrap_or_else(|| UserTrickProgress::new(trick_id));

        let question = match stored.level.next_question() {
            Some(level) => Some(
                self.content
                    .questions
                    .get(trick_id, level)
                    .ok_or_else(|| {
                        BowoError::not_found(format!("question {level} for '{trick_id}'"))
                    })?
                    .view(trick_id),
            ),
            None => None,
        };

        Ok(NextQuestion {
            trick_id: trick_id.to_string(),
            current_level: stored.level.value(),
            is_completed: stored.level.is_mastered(),
            question,
        })
    }

    /// Submit an answer to the question at `level` for a trick
    pub fn submit_answer(
        &self,
        user_id: &str,
        trick_id: &str,
        level: u8,
        user_answer: &str,
    ) -> BowoResult<AnswerResult> {
        let level = check_question_level(level)?;
        let trick = self.require_trick(trick_id)?;
        let question = self
            .content
            .questions
            .get(trick_id, level)
            .ok_or_else(|| BowoError::not_found(format!("question {level} for '{trick_id}'")))?;

        let (mut progress, freshness) = self.load_fresh(user_id)?;
        if let Err(e) = require_access(&progress, trick) {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Err(e);
        }

        let correct = question.is_correct(user_answer);
        let mut trick_progress = self
            .store
            .load_trick_progress(user_id, trick_id)?
            .unwrap_or_else(|| UserTrickProgress::new(trick_id));
        let previous = trick_progress.level;

        let transition = previous.answer(level, correct);
        trick_progress.level = transition.level_after(previous);
        trick_progress.last_question_at = Some(self.clock.now());
        self.store.save_trick_progress(user_id, &trick_progress)?;

        debug!(
            "[bowo:progress] {} answered '{}' level {}: {:?}",
            user_id, trick_id, level, transition
        );

        progress.questions_answered_today = progress.questions_answered_today.saturating_add(1);

        let mut deck_unlocked = None;
        let mut rewards = BadgeRewards::default();
        let newly_mastered =
            transition.reached_mastery() && progress.mastered_tricks.insert(trick_id.to_string());
        if newly_mastered {
            let deck = draw_new(&progress.unlocked_decks);
            progress.unlocked_decks.insert(deck.to_string());
            deck_unlocked = Some(deck);

            let mastered = progress.mastered_tricks.len();
            rewards = unlock_all(&mut progress, &mastery_badges(mastered));

            info!(
                "[bowo:progress] {} mastered '{}' ({} total), deck {}, badges {:?}",
                user_id,
                trick_id,
                mastered,
                deck,
                rewards.ids()
            );
        }
        self.save(user_id, &progress)?;

        let mut xp_gained = 0;
        let mut badges = rewards.ids();
        if transition.advanced() {
            let amount = self.settings.answer_xp + rewards.xp;
            match self.grant_xp(user_id, amount) {
                Ok(grant) => {
                    xp_gained = grant.total_xp();
                    badges.extend(grant.badges.iter().copied());
                }
                Err(e) => {
                    warn!(
                        "[bowo:progress] XP grant of {} for {} on '{}' failed, not applied: {}",
                        amount, user_id, trick_id, e
                    );
                }
            }
        }

        // The answer already counts; a failed re-read falls back to what was written
        let stored = match self.load(user_id) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("[bowo:progress] Re-reading progress of {} failed: {}", user_id, e);
                progress
            }
        };

        let expected_level = match transition {
            Transition::Unchanged(HoldReason::OutOfOrder { expected }) => Some(expected),
            _ => None,
        };

        Ok(AnswerResult {
            correct,
            previous_level: previous.value(),
            new_level: trick_progress.level.value(),
            expected_level,
            xp_gained,
            mastered: newly_mastered,
            already_mastered: matches!(
                transition,
                Transition::Unchanged(HoldReason::AlreadyMastered)
            ),
            deck_unlocked,
            badges,
            global_progress: self.to_dto(stored),
        })
    }
}

/// Starter tricks are open to everyone, the rest must be unlocked first
fn require_access(progress: &UserProgress, trick: &Trick) -> BowoResult<()> {
    if trick.is_starter() || progress.is_trick_unlocked(&trick.id) {
        Ok(())
    } else {
        Err(BowoError::Forbidden(format!("trick '{}' is locked", trick.id)))
    }
}
