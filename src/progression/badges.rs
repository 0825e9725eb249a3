//! Badge definitions, threshold checks and idempotent unlocking
//!
//! Badges are defined statically. A user's owned badges live in
//! `UserProgress::unlocked_badges`; the set is append-only.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::progress::UserProgress;

/// Unique identifier for each badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeId {
    // Mastery
    FirstMastery,
    SecondMastery,
    ThirdMastery,
    FiveMastered,

    // Streak
    Streak3,
    Streak5,
    Streak10,

    // Level
    Level5,
    Level10,
    Level20,

    // Unlock
    FirstUnlock,
    FiveUnlocked,
    TenUnlocked,

    // Quiz
    FirstQuizWin,

    // Deck
    FirstAliveDeck,
    AliveCollector,

    // Avatar
    BubbleChosen,
    FirstShopShape,

    // Mini-game
    FirstMiniGame,
    AllMiniGames,
}

impl BadgeId {
    /// Get the string ID for document storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstMastery => "first_mastery",
            Self::SecondMastery => "second_mastery",
            Self::ThirdMastery => "third_mastery",
            Self::FiveMastered => "five_mastered",
            Self::Streak3 => "streak_3",
            Self::Streak5 => "streak_5",
            Self::Streak10 => "streak_10",
            Self::Level5 => "level_5",
            Self::Level10 => "level_10",
            Self::Level20 => "level_20",
            Self::FirstUnlock => "first_unlock",
            Self::FiveUnlocked => "five_unlocked",
            Self::TenUnlocked => "ten_unlocked",
            Self::FirstQuizWin => "first_quiz_win",
            Self::FirstAliveDeck => "first_alive_deck",
            Self::AliveCollector => "alive_collector",
            Self::BubbleChosen => "bubble_chosen",
            Self::FirstShopShape => "first_shop_shape",
            Self::FirstMiniGame => "first_mini_game",
            Self::AllMiniGames => "all_mini_games",
        }
    }

    /// Parse from a stored string
    pub fn from_str(s: &str) -> Option<Self> {
        BADGES.iter().find(|b| b.id.as_str() == s).map(|b| b.id)
    }
}

/// Badge category for grouping in the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Mastery,
    Streak,
    Level,
    Unlock,
    Quiz,
    Deck,
    Avatar,
    MiniGame,
}

/// Badge definition with all metadata
#[derive(Debug, Clone)]
pub struct Badge {
    pub id: BadgeId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub xp_reward: u64,
}

/// All badge definitions
pub static BADGES: &[Badge] = &[
    // === MASTERY ===
    Badge {
        id: BadgeId::FirstMastery,
        title: "First Blood",
        description: "Master your first trick",
        icon: "🥇",
        category: BadgeCategory::Mastery,
        xp_reward: 100,
    },
    Badge {
        id: BadgeId::SecondMastery,
        title: "Double Up",
        description: "Master 2 tricks",
        icon: "✌️",
        category: BadgeCategory::Mastery,
        xp_reward: 150,
    },
    Badge {
        id: BadgeId::ThirdMastery,
        title: "Hat Trick",
        description: "Master 3 tricks",
        icon: "🎩",
        category: BadgeCategory::Mastery,
        xp_reward: 200,
    },
    Badge {
        id: BadgeId::FiveMastered,
        title: "Bag of Tricks",
        description: "Master 5 tricks",
        icon: "🎒",
        category: BadgeCategory::Mastery,
        xp_reward: 400,
    },
    // === STREAK ===
    Badge {
        id: BadgeId::Streak3,
        title: "Warming Up",
        description: "Skate 3 days in a row",
        icon: "🔥",
        category: BadgeCategory::Streak,
        xp_reward: 50,
    },
    Badge {
        id: BadgeId::Streak5,
        title: "On a Roll",
        description: "Skate 5 days in a row",
        icon: "🛞",
        category: BadgeCategory::Streak,
        xp_reward: 100,
    },
    Badge {
        id: BadgeId::Streak10,
        title: "Unstoppable",
        description: "Skate 10 days in a row",
        icon: "☄️",
        category: BadgeCategory::Streak,
        xp_reward: 250,
    },
    // === LEVEL ===
    Badge {
        id: BadgeId::Level5,
        title: "Street Cred",
        description: "Reach level 5",
        icon: "🏙️",
        category: BadgeCategory::Level,
        xp_reward: 75,
    },
    Badge {
        id: BadgeId::Level10,
        title: "Flip Mode",
        description: "Reach level 10",
        icon: "💫",
        category: BadgeCategory::Level,
        xp_reward: 150,
    },
    Badge {
        id: BadgeId::Level20,
        title: "Greatest of All Time",
        description: "Reach level 20",
        icon: "🐐",
        category: BadgeCategory::Level,
        xp_reward: 500,
    },
    // === UNLOCK ===
    Badge {
        id: BadgeId::FirstUnlock,
        title: "Drop In",
        description: "Unlock your first trick",
        icon: "🔓",
        category: BadgeCategory::Unlock,
        xp_reward: 25,
    },
    Badge {
        id: BadgeId::FiveUnlocked,
        title: "Trick Hunter",
        description: "Unlock 5 tricks",
        icon: "🗝️",
        category: BadgeCategory::Unlock,
        xp_reward: 75,
    },
    Badge {
        id: BadgeId::TenUnlocked,
        title: "Full Catalog",
        description: "Unlock 10 tricks",
        icon: "📚",
        category: BadgeCategory::Unlock,
        xp_reward: 150,
    },
    // === QUIZ ===
    Badge {
        id: BadgeId::FirstQuizWin,
        title: "Know-It-All",
        description: "Pass your first unlock quiz",
        icon: "🧠",
        category: BadgeCategory::Quiz,
        xp_reward: 40,
    },
    // === DECK ===
    Badge {
        id: BadgeId::FirstAliveDeck,
        title: "It's Alive",
        description: "Unlock your first alive deck",
        icon: "🧬",
        category: BadgeCategory::Deck,
        xp_reward: 60,
    },
    Badge {
        id: BadgeId::AliveCollector,
        title: "Deck Wall",
        description: "Own 5 alive decks",
        icon: "🖼️",
        category: BadgeCategory::Deck,
        xp_reward: 200,
    },
    // === AVATAR ===
    Badge {
        id: BadgeId::BubbleChosen,
        title: "New Face",
        description: "Pick your bubble avatar",
        icon: "🫧",
        category: BadgeCategory::Avatar,
        xp_reward: 20,
    },
    Badge {
        id: BadgeId::FirstShopShape,
        title: "Window Shopper",
        description: "Buy your first shape in the shop",
        icon: "🛍️",
        category: BadgeCategory::Avatar,
        xp_reward: 30,
    },
    // === MINI-GAME ===
    Badge {
        id: BadgeId::FirstMiniGame,
        title: "Game On",
        description: "Unlock your first mini-game",
        icon: "🎮",
        category: BadgeCategory::MiniGame,
        xp_reward: 30,
    },
    Badge {
        id: BadgeId::AllMiniGames,
        title: "Arcade Rat",
        description: "Unlock every mini-game",
        icon: "🕹️",
        category: BadgeCategory::MiniGame,
        xp_reward: 200,
    },
];

static BY_ID: Lazy<HashMap<&'static str, &'static Badge>> =
    Lazy::new(|| BADGES.iter().map(|b| (b.id.as_str(), b)).collect());

impl Badge {
    /// Look up a badge by its stored string id
    pub fn find(id: &str) -> Option<&'static Badge> {
        BY_ID.get(id).copied()
    }
}

/// Result of a single unlock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeUnlock {
    pub unlocked: bool,
    pub xp_reward: u64,
}

impl BadgeUnlock {
    const NONE: BadgeUnlock = BadgeUnlock {
        unlocked: false,
        xp_reward: 0,
    };
}

/// Unlock `badge_id` for this user.
///
/// Unknown ids and already-owned badges yield no reward. The caller applies
/// the returned XP through the XP-add path.
pub fn try_unlock(progress: &mut UserProgress, badge_id: &str) -> BadgeUnlock {
    let Some(badge) = Badge::find(badge_id) else {
        return BadgeUnlock::NONE;
    };
    if !progress.unlocked_badges.insert(badge_id.to_string()) {
        return BadgeUnlock::NONE;
    }
    BadgeUnlock {
        unlocked: true,
        xp_reward: badge.xp_reward,
    }
}

/// Badges unlocked by one check pass and their summed reward
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeRewards {
    pub unlocked: Vec<BadgeId>,
    pub xp: u64,
}

impl BadgeRewards {
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.unlocked.iter().map(|id| id.as_str()).collect()
    }

    pub fn merge(&mut self, other: BadgeRewards) {
        self.unlocked.extend(other.unlocked);
        self.xp += other.xp;
    }
}

/// Try every candidate and sum the rewards of the ones newly unlocked
pub fn unlock_all(progress: &mut UserProgress, candidates: &[BadgeId]) -> BadgeRewards {
    let mut rewards = BadgeRewards::default();
    for id in candidates {
        let result = try_unlock(progress, id.as_str());
        if result.unlocked {
            rewards.unlocked.push(*id);
            rewards.xp += result.xp_reward;
        }
    }
    rewards
}

fn reached(value: u64, milestones: &[(u64, BadgeId)]) -> Vec<BadgeId> {
    milestones
        .iter()
        .filter(|(threshold, _)| value >= *threshold)
        .map(|(_, id)| *id)
        .collect()
}

/// Mastered-trick thresholds {1, 2, 3, 5}
pub fn mastery_badges(mastered: usize) -> Vec<BadgeId> {
    reached(
        mastered as u64,
        &[
            (1, BadgeId::FirstMastery),
            (2, BadgeId::SecondMastery),
            (3, BadgeId::ThirdMastery),
            (5, BadgeId::FiveMastered),
        ],
    )
}

/// Daily streak thresholds {3, 5, 10}
pub fn streak_badges(streak: u32) -> Vec<BadgeId> {
    reached(
        streak as u64,
        &[
            (3, BadgeId::Streak3),
            (5, BadgeId::Streak5),
            (10, BadgeId::Streak10),
        ],
    )
}

/// Level thresholds {5, 10, 20}
pub fn level_badges(level: u32) -> Vec<BadgeId> {
    reached(
        level as u64,
        &[
            (5, BadgeId::Level5),
            (10, BadgeId::Level10),
            (20, BadgeId::Level20),
        ],
    )
}

/// Unlocked-trick thresholds {1, 5, 10}
pub fn unlock_badges(unlocked: usize) -> Vec<BadgeId> {
    reached(
        unlocked as u64,
        &[
            (1, BadgeId::FirstUnlock),
            (5, BadgeId::FiveUnlocked),
            (10, BadgeId::TenUnlocked),
        ],
    )
}

/// Alive-deck thresholds {1, 5}
pub fn alive_deck_badges(owned: usize) -> Vec<BadgeId> {
    reached(
        owned as u64,
        &[(1, BadgeId::FirstAliveDeck), (5, BadgeId::AliveCollector)],
    )
}

/// Mini-game thresholds: first, and the whole catalog
pub fn mini_game_badges(owned: usize, catalog_size: usize) -> Vec<BadgeId> {
    reached(
        owned as u64,
        &[
            (1, BadgeId::FirstMiniGame),
            (catalog_size as u64, BadgeId::AllMiniGames),
        ],
    )
}
