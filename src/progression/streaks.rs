//! Daily streak tracking and the once-per-day rollover
//!
//! Days are UTC calendar dates, not rolling 24h windows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::badges::{streak_badges, unlock_all};
use super::progress::UserProgress;
use super::xp::{apply_xp, XpGrant};

/// Today's UTC date
pub fn utc_day(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// How the streak moved on rollover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakChange {
    pub previous: u32,
    pub current: u32,
    /// True when the gap was not exactly one day
    pub reset: bool,
}

/// Move the streak to `today`. None when today was already counted.
///
/// Also clears the per-day question and XP counters and stamps the activity date.
pub fn roll_streak(progress: &mut UserProgress, today: NaiveDate) -> Option<StreakChange> {
    let last = progress.last_activity_date_utc;
    if last == Some(today) {
        return None;
    }

    let previous = progress.daily_streak;
    let continues = last.is_some_and(|day| (today - day).num_days() == 1);
    progress.daily_streak = if continues { previous + 1 } else { 1 };
    progress.questions_answered_today = 0;
    progress.xp_gained_today = 0;
    progress.last_activity_date_utc = Some(today);

    Some(StreakChange {
        previous,
        current: progress.daily_streak,
        reset: !continues,
    })
}

/// Result of the daily rollover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRollover {
    pub streak: StreakChange,
    pub badges: Vec<&'static str>,
    /// Bonus XP grant for the streak badges, if any unlocked
    pub bonus: Option<XpGrant>,
}

/// Run the daily rollover: streak, counters, streak badges and their XP.
pub fn update_daily_progress(
    progress: &mut UserProgress,
    today: NaiveDate,
    xp_per_coin: u64,
) -> Option<DailyRollover> {
    let streak = roll_streak(progress, today)?;

    let rewards = unlock_all(progress, &streak_badges(streak.current));
    let bonus = (rewards.xp > 0).then(|| apply_xp(progress, rewards.xp, xp_per_coin));

    Some(DailyRollover {
        streak,
        badges: rewards.ids(),
        bonus,
    })
}

/// What `ensure_fresh` changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Freshness {
    pub unlock_counter_reset: bool,
    pub rollover: Option<DailyRollover>,
}

impl Freshness {
    pub fn changed(&self) -> bool {
        self.unlock_counter_reset || self.rollover.is_some()
    }
}

/// Bring the per-day state up to `today` before any read or mutation.
pub fn ensure_fresh(progress: &mut UserProgress, today: NaiveDate, xp_per_coin: u64) -> Freshness {
    Freshness {
        unlock_counter_reset: progress.reset_unlock_counter_if_stale(today),
        rollover: update_daily_progress(progress, today, xp_per_coin),
    }
}
