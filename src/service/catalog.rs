//! Catalog listings annotated with the caller's state

use std::collections::HashMap;

use super::{BadgeEntry, LevelEntry, ProgressService, TrickEntry};
use crate::error::BowoResult;
use crate::progression::{BADGES, LEVELS};

impl ProgressService {
    pub fn list_tricks(&self, user_id: &str) -> BowoResult<Vec<TrickEntry>> {
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;
        let levels: HashMap<String, u8> = self
            .store
            .list_trick_progress(user_id)?
            .into_iter()
            .map(|p| (p.trick_id, p.level.value()))
            .collect();

        Ok(self
            .content
            .tricks
            .all()
            .iter()
            .map(|trick| TrickEntry {
                starter: trick.is_starter(),
                unlocked: progress.is_trick_unlocked(&trick.id),
                mastered: progress.mastered_tricks.contains(&trick.id),
                level: levels.get(&trick.id).copied().unwrap_or(0),
                trick: trick.clone(),
            })
            .collect())
    }

    pub fn list_badges(&self, user_id: &str) -> BowoResult<Vec<BadgeEntry>> {
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;
        Ok(BADGES
            .iter()
            .map(|badge| BadgeEntry {
                id: badge.id.as_str(),
                title: badge.title,
                description: badge.description,
                icon: badge.icon,
                category: badge.category,
                xp_reward: badge.xp_reward,
                unlocked: progress.unlocked_badges.contains(badge.id.as_str()),
            })
            .collect())
    }
}

/// The level curve
pub fn list_levels() -> Vec<LevelEntry> {
    LEVELS
        .iter()
        .map(|l| LevelEntry {
            level: l.level,
            xp_required: l.xp_required,
            emoji: l.emoji,
            title: l.title,
        })
        .collect()
}
