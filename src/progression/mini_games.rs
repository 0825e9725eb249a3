//! Mini-game catalog and slot accounting
//!
//! One slot opens per `tricks_per_slot` unlocked tricks. Like alive-deck
//! tokens, free slots are derived from the document on every read.

use super::progress::UserProgress;

pub static MINI_GAMES: &[&str] = &[
    "slot_machine",
    "trick_roulette",
    "game_of_skate",
    "line_builder",
    "spot_hunt",
    "skate_dice",
];

pub fn is_mini_game(key: &str) -> bool {
    MINI_GAMES.contains(&key)
}

/// Free mini-game slots, never negative
pub fn available_slots(progress: &UserProgress, tricks_per_slot: u32) -> u64 {
    let earned = progress.unlocked_tricks.len() as u64 / u64::from(tricks_per_slot.max(1));
    let used = progress
        .unlocked_mini_games
        .iter()
        .filter(|key| is_mini_game(key))
        .count() as u64;
    earned.saturating_sub(used)
}
