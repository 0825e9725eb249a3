//! Skill-deck and alive-deck catalogs
//!
//! Skill decks are drawn at random when a trick is mastered. Alive decks are
//! bought with tokens derived from XP; the token balance is never stored.

use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::progress::UserProgress;

/// Skill decks awarded on trick mastery
pub static SKILL_DECKS: &[&str] = &[
    "deck_classic_popsicle",
    "deck_checkerboard",
    "deck_flame_job",
    "deck_bones_brigade",
    "deck_palm_sunset",
    "deck_pixel_ollie",
    "deck_street_map",
    "deck_concrete_wave",
    "deck_neon_grid",
    "deck_tiger_stripe",
    "deck_blueprint",
    "deck_zine_collage",
    "deck_woodgrain",
    "deck_halftone",
    "deck_cosmic_cat",
    "deck_roller_rink",
    "deck_bandana",
    "deck_thunderbolt",
    "deck_sticker_bomb",
    "deck_gold_leaf",
];

/// Visual-effect family of an alive deck. Not used by unlock logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AliveFamily {
    Aurora,
    Glitch,
    Vhs,
    Holo,
    Lava,
}

#[derive(Debug, Clone, Serialize)]
pub struct AliveDeck {
    pub id: &'static str,
    pub family: AliveFamily,
}

const fn alive(id: &'static str, family: AliveFamily) -> AliveDeck {
    AliveDeck { id, family }
}

/// Alive (animated) decks unlocked with tokens
pub static ALIVE_DECKS: &[AliveDeck] = &[
    alive("aurora_dawn", AliveFamily::Aurora),
    alive("aurora_borealis", AliveFamily::Aurora),
    alive("aurora_mint", AliveFamily::Aurora),
    alive("aurora_violet", AliveFamily::Aurora),
    alive("aurora_storm", AliveFamily::Aurora),
    alive("glitch_static", AliveFamily::Glitch),
    alive("glitch_rgb_split", AliveFamily::Glitch),
    alive("glitch_datamosh", AliveFamily::Glitch),
    alive("glitch_scanline", AliveFamily::Glitch),
    alive("glitch_bitcrush", AliveFamily::Glitch),
    alive("vhs_tracking", AliveFamily::Vhs),
    alive("vhs_rewind", AliveFamily::Vhs),
    alive("vhs_home_video", AliveFamily::Vhs),
    alive("vhs_late_night", AliveFamily::Vhs),
    alive("vhs_bootleg", AliveFamily::Vhs),
    alive("holo_prism", AliveFamily::Holo),
    alive("holo_foil", AliveFamily::Holo),
    alive("holo_oil_slick", AliveFamily::Holo),
    alive("holo_pearl", AliveFamily::Holo),
    alive("holo_diamond", AliveFamily::Holo),
    alive("lava_magma", AliveFamily::Lava),
    alive("lava_ember", AliveFamily::Lava),
    alive("lava_obsidian", AliveFamily::Lava),
    alive("lava_eruption", AliveFamily::Lava),
    alive("lava_cinder", AliveFamily::Lava),
];

pub fn find_alive_deck(id: &str) -> Option<&'static AliveDeck> {
    ALIVE_DECKS.iter().find(|d| d.id == id)
}

/// Draw a skill deck the user does not own yet.
///
/// When every deck is owned the draw falls back to the whole pool, so a
/// duplicate can be returned.
pub fn draw_new(already_owned: &BTreeSet<String>) -> &'static str {
    draw_new_with(already_owned, &mut rand::thread_rng())
}

/// `draw_new` with an explicit random source
pub fn draw_new_with<R: Rng + ?Sized>(
    already_owned: &BTreeSet<String>,
    rng: &mut R,
) -> &'static str {
    let candidates: Vec<&'static str> = SKILL_DECKS
        .iter()
        .copied()
        .filter(|id| !already_owned.contains(*id))
        .collect();

    let pool = if candidates.is_empty() {
        SKILL_DECKS
    } else {
        candidates.as_slice()
    };
    pool.choose(rng).copied().unwrap_or(SKILL_DECKS[0])
}

/// Drop blank, unknown and duplicate alive-deck ids, keeping first-seen order
pub fn sanitize(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .filter(|id| find_alive_deck(id).is_some())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

/// Tokens left for alive decks: one per `xp_per_token` XP, minus valid decks owned.
pub fn compute_available_tokens(progress: &UserProgress, xp_per_token: u64) -> u64 {
    let earned = progress.xp / xp_per_token.max(1);
    let spent = sanitize(&progress.unlocked_alive_decks).len() as u64;
    earned.saturating_sub(spent)
}
