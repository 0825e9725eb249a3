//! XP-add path
//!
//! Every XP grant goes through `apply_xp`: it bumps XP and the daily counter,
//! unlocks level badges, credits coins and grants level shapes.

use serde::Serialize;

use super::avatars::sync_level_shapes;
use super::badges::{level_badges, unlock_all, BadgeRewards};
use super::levels::Level;
use super::progress::UserProgress;

/// XP rewards for the fixed-value actions
pub struct XpRewards;

impl XpRewards {
    /// Correct, in-order mastery question
    pub const CORRECT_ANSWER: u64 = 20;

    /// Trick unlocked through the daily quota (or an ad/purchase)
    pub const TRICK_UNLOCK: u64 = 120;

    /// Trick unlocked by passing its quiz
    pub const QUIZ_UNLOCK: u64 = 50;
}

/// What one XP grant changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpGrant {
    /// XP requested by the caller
    pub base_xp: u64,
    /// Extra XP from level badges unlocked by this grant
    pub bonus_xp: u64,
    pub coins_earned: u64,
    pub level_before: u32,
    pub level_after: u32,
    pub badges: Vec<&'static str>,
    pub new_shapes: Vec<&'static str>,
}

impl XpGrant {
    pub fn total_xp(&self) -> u64 {
        self.base_xp + self.bonus_xp
    }

    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Add `amount` XP to the aggregate.
///
/// Level badges are checked once against the level reached by `amount`.
/// Their reward is credited without another check, so badge XP never
/// unlocks further level badges in the same grant.
pub fn apply_xp(progress: &mut UserProgress, amount: u64, xp_per_coin: u64) -> XpGrant {
    let xp_before = progress.xp;
    let level_before = Level::for_xp(xp_before).level;

    credit(progress, amount);
    let reached = Level::for_xp(progress.xp).level;

    let rewards: BadgeRewards = if reached > level_before {
        unlock_all(progress, &level_badges(reached))
    } else {
        BadgeRewards::default()
    };
    credit(progress, rewards.xp);

    let level_after = Level::for_xp(progress.xp).level;
    let new_shapes = sync_level_shapes(progress, level_after);

    let per_coin = xp_per_coin.max(1);
    let coins_earned = progress.xp / per_coin - xp_before / per_coin;
    progress.coins += coins_earned;

    XpGrant {
        base_xp: amount,
        bonus_xp: rewards.xp,
        coins_earned,
        level_before,
        level_after,
        badges: rewards.ids(),
        new_shapes,
    }
}

fn credit(progress: &mut UserProgress, amount: u64) {
    progress.xp = progress.xp.saturating_add(amount);
    progress.xp_gained_today = progress.xp_gained_today.saturating_add(amount);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_grant() {
        let mut progress = UserProgress::default();
        let grant = apply_xp(&mut progress, 20, 10);
        assert_eq!(progress.xp, 20);
        assert_eq!(progress.xp_gained_today, 20);
        assert_eq!(progress.coins, 2);
        assert_eq!(grant.total_xp(), 20);
        assert!(!grant.leveled_up());
    }

    #[test]
    fn test_coins_do_not_drift_on_remainders() {
        let mut progress = UserProgress::default();
        for _ in 0..3 {
            apply_xp(&mut progress, 7, 10);
        }
        assert_eq!(progress.xp, 21);
        assert_eq!(progress.coins, 2);
    }

    #[test]
    fn test_level_up_grants_shapes() {
        let mut progress = UserProgress::default();
        let grant = apply_xp(&mut progress, 260, 10);
        assert_eq!(grant.level_after, 3);
        assert_eq!(grant.new_shapes, vec!["shape_circle"]);
        assert_eq!(progress.shape_avatar_id.as_deref(), Some("shape_circle"));
    }

    #[test]
    fn test_level_badge_bonus_does_not_retrigger() {
        // 3700 + 120 = 3820 reaches level 10 (3800): level_5 and level_10 unlock.
        let mut progress = UserProgress {
            xp: 3700,
            ..Default::default()
        };
        let grant = apply_xp(&mut progress, 120, 10);
        assert_eq!(grant.badges, vec!["level_5", "level_10"]);
        assert_eq!(grant.bonus_xp, 75 + 150);
        assert_eq!(progress.xp, 3700 + 120 + 225);
    }

    #[test]
    fn test_owned_level_badges_not_rewarded_again() {
        let mut progress = UserProgress {
            xp: 3700,
            ..Default::default()
        };
        progress.unlocked_badges.insert("level_5".to_string());
        let grant = apply_xp(&mut progress, 120, 10);
        assert_eq!(grant.badges, vec!["level_10"]);
        assert_eq!(grant.bonus_xp, 150);
    }

    #[test]
    fn test_no_level_up_no_badge_check() {
        let mut progress = UserProgress {
            xp: 21_900,
            ..Default::default()
        };
        let grant = apply_xp(&mut progress, 90, 10);
        assert!(grant.badges.is_empty());
        assert_eq!(grant.level_after, 19);
    }
}
