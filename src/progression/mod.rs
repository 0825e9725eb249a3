//! Progression engine: XP, levels, badges, streaks, decks, avatars and trick mastery
//!
//! Everything here is pure logic over a `UserProgress` document. Loading and
//! persisting the document is the job of `service` and `store`.

pub mod avatars;
pub mod badges;
pub mod decks;
mod levels;
pub mod mastery;
pub mod mini_games;
mod progress;
pub mod streaks;
mod xp;

pub use badges::{Badge, BadgeCategory, BadgeId, BadgeRewards, BadgeUnlock, BADGES};
pub use levels::{Level, LevelInfo, LEVELS};
pub use mastery::{HoldReason, TrickLevel, Transition, MASTERY_LEVEL};
pub use progress::{UserProgress, UserTrickProgress};
pub use streaks::{ensure_fresh, update_daily_progress, DailyRollover, Freshness, StreakChange};
pub use xp::{apply_xp, XpGrant, XpRewards};
