//! Alive decks, bubble avatars, the shape shop and mini-games

use tracing::info;

use super::unlocks::merged_badges;
use super::{
    AliveDeckEntry, AliveDeckList, AliveDeckUnlock, BubbleChoice, BubbleList, MiniGameUnlock,
    ProgressService, ShopItem, ShopList, ShopPurchase,
};
use crate::error::{BowoError, BowoResult};
use crate::progression::avatars::{find_shop_shape, is_bubble, offered_bubbles, SHAPE_SHOP};
use crate::progression::badges::{alive_deck_badges, mini_game_badges, unlock_all};
use crate::progression::decks::{compute_available_tokens, find_alive_deck, sanitize, ALIVE_DECKS};
use crate::progression::mini_games::{available_slots, is_mini_game, MINI_GAMES};
use crate::progression::{BadgeId, BadgeRewards, Level, UserProgress};

impl ProgressService {
    pub fn list_alive_decks(&self, user_id: &str) -> BowoResult<AliveDeckList> {
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;

        let owned = sanitize(&progress.unlocked_alive_decks);
        let decks = ALIVE_DECKS
            .iter()
            .map(|deck| AliveDeckEntry {
                id: deck.id,
                family: deck.family,
                owned: owned.iter().any(|id| id == deck.id),
            })
            .collect();

        Ok(AliveDeckList {
            decks,
            owned,
            available_tokens: compute_available_tokens(&progress, self.settings.xp_per_alive_token),
        })
    }

    /// Spend one token on an alive deck
    pub fn unlock_alive_deck(&self, user_id: &str, deck_id: &str) -> BowoResult<AliveDeckUnlock> {
        let deck = find_alive_deck(deck_id)
            .ok_or_else(|| BowoError::not_found(format!("alive deck '{deck_id}'")))?;
        let (mut progress, freshness) = self.load_fresh(user_id)?;
        let per_token = self.settings.xp_per_alive_token;

        let mut owned = sanitize(&progress.unlocked_alive_decks);
        if owned.iter().any(|id| id == deck.id) {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Ok(AliveDeckUnlock {
                deck_id: deck.id.to_string(),
                already_owned: true,
                available_tokens: compute_available_tokens(&progress, per_token),
                xp_gained: 0,
                badges: Vec::new(),
            });
        }

        if compute_available_tokens(&progress, per_token) == 0 {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Err(BowoError::NoTokens);
        }

        owned.push(deck.id.to_string());
        let count = owned.len();
        progress.unlocked_alive_decks = owned;

        let rewards = unlock_all(&mut progress, &alive_deck_badges(count));
        let (xp_gained, badges) = self.credit_badges(&mut progress, &rewards);
        self.save(user_id, &progress)?;

        info!("[bowo:progress] {} unlocked alive deck '{}'", user_id, deck.id);
        Ok(AliveDeckUnlock {
            deck_id: deck.id.to_string(),
            already_owned: false,
            available_tokens: compute_available_tokens(&progress, per_token),
            xp_gained,
            badges,
        })
    }

    pub fn list_bubbles(&self, user_id: &str) -> BowoResult<BubbleList> {
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;

        let level = Level::for_xp(progress.xp).level;
        let min_level = self.settings.bubble_min_level;
        Ok(BubbleList {
            offered: offered_bubbles(&progress, level, min_level),
            chosen: progress.bubble_avatar_id.clone(),
            level,
            min_level,
        })
    }

    /// Pick the bubble avatar. It can be chosen once; repeating the same
    /// choice is a no-op, a different one is a conflict.
    pub fn choose_bubble(&self, user_id: &str, bubble_id: &str) -> BowoResult<BubbleChoice> {
        if !is_bubble(bubble_id) {
            return Err(BowoError::not_found(format!("bubble avatar '{bubble_id}'")));
        }
        let (mut progress, freshness) = self.load_fresh(user_id)?;

        if let Some(chosen) = progress.bubble_avatar_id.clone() {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            if chosen != bubble_id {
                return Err(BowoError::Conflict(format!(
                    "bubble avatar already chosen ('{chosen}')"
                )));
            }
            return Ok(BubbleChoice {
                bubble_avatar_id: chosen,
                already_chosen: true,
                xp_gained: 0,
                badges: Vec::new(),
            });
        }

        let level = Level::for_xp(progress.xp).level;
        if level < self.settings.bubble_min_level {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Err(BowoError::Forbidden(format!(
                "bubble avatars open at level {}",
                self.settings.bubble_min_level
            )));
        }

        progress.bubble_avatar_id = Some(bubble_id.to_string());
        let rewards = unlock_all(&mut progress, &[BadgeId::BubbleChosen]);
        let (xp_gained, badges) = self.credit_badges(&mut progress, &rewards);
        self.save(user_id, &progress)?;

        info!("[bowo:progress] {} chose bubble '{}'", user_id, bubble_id);
        Ok(BubbleChoice {
            bubble_avatar_id: bubble_id.to_string(),
            already_chosen: false,
            xp_gained,
            badges,
        })
    }

    pub fn list_shop_shapes(&self, user_id: &str) -> BowoResult<ShopList> {
        let (progress, freshness) = self.load_fresh(user_id)?;
        self.save_if_fresh(user_id, &progress, &freshness)?;

        let items = SHAPE_SHOP
            .iter()
            .map(|shape| ShopItem {
                id: shape.id.clone(),
                family: shape.family,
                price: shape.price,
                owned: progress.unlocked_shape_avatar_ids.contains(&shape.id),
                equipped: progress.shape_avatar_id.as_deref() == Some(shape.id.as_str()),
            })
            .collect();

        Ok(ShopList {
            coins: progress.coins,
            shape_avatar_id: progress.shape_avatar_id,
            items,
        })
    }

    /// Buy a shop shape with coins and equip it. Buying an owned shape only re-equips it.
    pub fn buy_shop_shape(&self, user_id: &str, shape_id: &str) -> BowoResult<ShopPurchase> {
        let shape = find_shop_shape(shape_id)
            .ok_or_else(|| BowoError::not_found(format!("shop shape '{shape_id}'")))?;
        let (mut progress, freshness) = self.load_fresh(user_id)?;

        if progress.unlocked_shape_avatar_ids.contains(&shape.id) {
            progress.shape_avatar_id = Some(shape.id.clone());
            self.save(user_id, &progress)?;
            return Ok(ShopPurchase {
                shape_id: shape.id.clone(),
                already_owned: true,
                coins_spent: 0,
                coins_left: progress.coins,
                xp_gained: 0,
                badges: Vec::new(),
            });
        }

        if progress.coins < shape.price {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Err(BowoError::InsufficientCoins {
                needed: shape.price,
                available: progress.coins,
            });
        }

        progress.coins -= shape.price;
        progress.unlocked_shape_avatar_ids.insert(shape.id.clone());
        progress.shape_avatar_id = Some(shape.id.clone());

        let rewards = unlock_all(&mut progress, &[BadgeId::FirstShopShape]);
        let (xp_gained, badges) = self.credit_badges(&mut progress, &rewards);
        self.save(user_id, &progress)?;

        info!(
            "[bowo:progress] {} bought '{}' for {} coins",
            user_id, shape.id, shape.price
        );
        Ok(ShopPurchase {
            shape_id: shape.id.clone(),
            already_owned: false,
            coins_spent: shape.price,
            coins_left: progress.coins,
            xp_gained,
            badges,
        })
    }

    /// Open a mini-game using a free slot
    pub fn unlock_mini_game(&self, user_id: &str, key: &str) -> BowoResult<MiniGameUnlock> {
        if !is_mini_game(key) {
            return Err(BowoError::not_found(format!("mini-game '{key}'")));
        }
        let per_slot = self.settings.tricks_per_mini_game;
        let (mut progress, freshness) = self.load_fresh(user_id)?;

        if progress.unlocked_mini_games.contains(key) {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Ok(MiniGameUnlock {
                key: key.to_string(),
                already_unlocked: true,
                available_slots: available_slots(&progress, per_slot),
                xp_gained: 0,
                badges: Vec::new(),
            });
        }

        if available_slots(&progress, per_slot) == 0 {
            self.save_if_fresh(user_id, &progress, &freshness)?;
            return Err(BowoError::Forbidden(format!(
                "no free mini-game slot, one opens every {per_slot} unlocked tricks"
            )));
        }

        progress.unlocked_mini_games.insert(key.to_string());
        let owned = progress
            .unlocked_mini_games
            .iter()
            .filter(|k| is_mini_game(k))
            .count();
        let rewards = unlock_all(&mut progress, &mini_game_badges(owned, MINI_GAMES.len()));
        let (xp_gained, badges) = self.credit_badges(&mut progress, &rewards);
        self.save(user_id, &progress)?;

        info!("[bowo:progress] {} unlocked mini-game '{}'", user_id, key);
        Ok(MiniGameUnlock {
            key: key.to_string(),
            already_unlocked: false,
            available_slots: available_slots(&progress, per_slot),
            xp_gained,
            badges,
        })
    }

    /// Credit the XP of freshly unlocked badges in memory
    fn credit_badges(
        &self,
        progress: &mut UserProgress,
        rewards: &BadgeRewards,
    ) -> (u64, Vec<&'static str>) {
        if rewards.xp == 0 {
            return (0, rewards.ids());
        }
        let grant = self.credit(progress, rewards.xp);
        (grant.total_xp(), merged_badges(rewards, &grant.badges))
    }
}
