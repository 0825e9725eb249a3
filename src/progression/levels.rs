//! XP and Level system
//!
//! Defines the level curve, titles and the XP lookup used by every progress read.

use serde::Serialize;

/// Level definition
#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    pub xp_required: u64,
    pub emoji: &'static str,
    pub title: &'static str,
}

/// All level definitions (must be sorted by level)
pub static LEVELS: &[Level] = &[
    Level::new(1, 0, "🛹", "Rookie"),
    Level::new(2, 100, "👟", "Pusher"),
    Level::new(3, 250, "🌀", "Cruiser"),
    Level::new(4, 500, "🧢", "Grommet"),
    Level::new(5, 800, "🔥", "Street Rat"),
    Level::new(6, 1200, "⚡", "Ledge Hunter"),
    Level::new(7, 1700, "🎯", "Rail Slider"),
    Level::new(8, 2300, "🌊", "Bowl Rider"),
    Level::new(9, 3000, "🏁", "Park Rat"),
    Level::new(10, 3800, "💎", "Flip Artist"),
    Level::new(11, 4700, "🚀", "Air Seeker"),
    Level::new(12, 5700, "🦅", "Transition Pro"),
    Level::new(13, 6800, "🌪️", "Combo King"),
    Level::new(14, 8000, "🏆", "Local Legend"),
    Level::new(15, 9500, "👑", "Sponsored"),
    Level::new(16, 11000, "🌋", "Street Legend"),
    Level::new(17, 13000, "🛸", "Vert Master"),
    Level::new(18, 15500, "🌌", "Icon"),
    Level::new(19, 18500, "⭐", "Hall of Famer"),
    Level::new(20, 22000, "🐐", "G.O.A.T."),
];

impl Level {
    const fn new(level: u32, xp_required: u64, emoji: &'static str, title: &'static str) -> Self {
        Self {
            level,
            xp_required,
            emoji,
            title,
        }
    }

    /// Highest level whose threshold is at or below `xp`
    pub fn for_xp(xp: u64) -> &'static Level {
        LEVELS
            .iter()
            .rev()
            .find(|l| xp >= l.xp_required)
            .unwrap_or(&LEVELS[0])
    }

    /// Get XP needed for next level (None if max level)
    pub fn xp_for_next(current_level: u32) -> Option<u64> {
        LEVELS
            .iter()
            .find(|l| l.level == current_level + 1)
            .map(|l| l.xp_required)
    }

    /// Get max level
    pub fn max_level() -> u32 {
        LEVELS.last().map(|l| l.level).unwrap_or(1)
    }
}

/// Level descriptor computed from cumulative XP.
///
/// Always computed fresh from the stored XP, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u32,
    pub title: String,
    pub emoji: String,
    pub current_level_min_xp: u64,
    pub next_level_min_xp: u64,
    pub xp_to_next_level: u64,
    pub max_level: u32,
    pub is_max_level: bool,
}

impl LevelInfo {
    /// Compute the level descriptor. Negative XP is clamped to 0.
    pub fn compute(xp: i64) -> Self {
        let xp = xp.max(0) as u64;
        let current = Level::for_xp(xp);
        let next_min = Level::xp_for_next(current.level).unwrap_or(current.xp_required);
        let max_level = Level::max_level();

        Self {
            level: current.level,
            title: current.title.to_string(),
            emoji: current.emoji.to_string(),
            current_level_min_xp: current.xp_required,
            next_level_min_xp: next_min,
            xp_to_next_level: next_min.saturating_sub(xp),
            max_level,
            is_max_level: current.level == max_level,
        }
    }

    /// Calculate progress percentage to next level (0.0 - 1.0)
    pub fn progress_to_next(&self, xp: u64) -> f32 {
        if self.is_max_level {
            return 1.0;
        }
        let span = self.next_level_min_xp - self.current_level_min_xp;
        if span == 0 {
            1.0
        } else {
            (xp.saturating_sub(self.current_level_min_xp) as f32) / (span as f32)
        }
    }
}
