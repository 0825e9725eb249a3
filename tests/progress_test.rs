//! Progress reads, streaks, tokens, cosmetics and mini-games

mod common;

use bowo::progression::UserProgress;
use bowo::BowoError;
use common::TestEnv;

#[test]
fn test_first_read_creates_default_document() {
    let env = TestEnv::new();
    let dto = env.service.get_progress("new-user").unwrap();

    assert_eq!(dto.progress.xp, 0);
    assert_eq!(dto.level.level, 1);
    assert_eq!(dto.level.next_level_min_xp, 100);
    assert_eq!(dto.progress.daily_streak, 1);
    assert_eq!(dto.daily_unlocks_remaining, 3);
    assert_eq!(env.stored("new-user").daily_streak, 1);
}

#[test]
fn test_streak_rollover() {
    let env = TestEnv::new();

    let first = env.service.update_daily("u1").unwrap();
    assert!(first.rolled_over);
    assert_eq!(first.streak, 1);

    let same_day = env.service.update_daily("u1").unwrap();
    assert!(!same_day.rolled_over);
    assert_eq!(same_day.streak, 1);

    env.clock.advance_days(1);
    assert_eq!(env.service.update_daily("u1").unwrap().streak, 2);

    env.clock.advance_days(1);
    let third = env.service.update_daily("u1").unwrap();
    assert_eq!(third.streak, 3);
    assert_eq!(third.badges, vec!["streak_3"]);
    assert_eq!(third.bonus_xp, 50);
    assert_eq!(env.stored("u1").xp, 50);

    env.clock.advance_days(3);
    let reset = env.service.update_daily("u1").unwrap();
    assert_eq!(reset.streak, 1);
    assert!(reset.streak_change.unwrap().reset);
}

#[test]
fn test_streak_follows_utc_calendar_days() {
    let env = TestEnv::new();
    env.clock.set(common::utc(4, 23, 59));
    assert_eq!(env.service.update_daily("u1").unwrap().streak, 1);

    // Two minutes later, across midnight
    env.clock.set(common::utc(5, 0, 1));
    let next = env.service.update_daily("u1").unwrap();
    assert!(next.rolled_over);
    assert_eq!(next.streak, 2);

    env.clock.set(common::utc(5, 23, 59));
    let same_day = env.service.update_daily("u1").unwrap();
    assert!(!same_day.rolled_over);
    assert_eq!(same_day.streak, 2);

    // A whole calendar day skipped breaks the streak
    env.clock.set(common::utc(7, 0, 1));
    let broken = env.service.update_daily("u1").unwrap();
    assert_eq!(broken.streak, 1);
    assert!(broken.streak_change.unwrap().reset);
}

#[test]
fn test_rejected_answer_keeps_new_day_streak() {
    let env = TestEnv::new();
    env.service.get_progress("u1").unwrap();

    env.clock.advance_days(1);
    let err = env.service.submit_answer("u1", "kickflip", 1, "x").unwrap_err();
    assert!(matches!(err, BowoError::Forbidden(_)));

    let stored = env.stored("u1");
    assert_eq!(stored.daily_streak, 2);
    assert_eq!(stored.questions_answered_today, 0);
}

#[test]
fn test_unaffordable_purchase_keeps_new_day_streak() {
    let env = TestEnv::new();
    env.service.get_progress("u1").unwrap();
    let mut progress = env.stored("u1");
    progress.coins = 10;
    env.store_progress("u1", &progress);

    env.clock.advance_days(1);
    assert!(matches!(
        env.service.buy_shop_shape("u1", "shop_neon_orb"),
        Err(BowoError::InsufficientCoins { needed: 50, available: 10 })
    ));

    let stored = env.stored("u1");
    assert_eq!(stored.daily_streak, 2);
    assert_eq!(stored.coins, 10);
}

#[test]
fn test_rollover_clears_daily_counters_on_any_read() {
    let env = TestEnv::new();
    env.service.submit_answer("u1", "ollie", 1, "back foot").unwrap();
    assert_eq!(env.stored("u1").questions_answered_today, 1);
    assert_eq!(env.stored("u1").xp_gained_today, 20);

    env.clock.advance_days(1);
    let dto = env.service.get_progress("u1").unwrap();
    assert_eq!(dto.progress.questions_answered_today, 0);
    assert_eq!(dto.progress.xp_gained_today, 0);
    assert_eq!(dto.progress.daily_streak, 2);
    assert_eq!(dto.progress.xp, 20);
}

fn with_alive_decks(xp: u64, decks: &[&str]) -> UserProgress {
    UserProgress {
        xp,
        unlocked_alive_decks: decks.iter().map(|d| d.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn test_alive_tokens_spent_one_per_deck() {
    let env = TestEnv::new();
    let owned = [
        "aurora_dawn",
        "aurora_mint",
        "glitch_static",
        "glitch_datamosh",
        "vhs_rewind",
        "vhs_tracking",
        "holo_prism",
        "lava_ember",
    ];
    for id in owned {
        assert!(bowo::progression::decks::find_alive_deck(id).is_some(), "{id}");
    }
    env.store_progress("u1", &with_alive_decks(12_000, &owned));

    let list = env.service.list_alive_decks("u1").unwrap();
    assert_eq!(list.available_tokens, 4);
    assert_eq!(list.owned.len(), 8);

    let target = list.decks.iter().find(|d| !d.owned).unwrap().id;
    let unlock = env.service.unlock_alive_deck("u1", target).unwrap();
    assert!(!unlock.already_owned);
    assert_eq!(unlock.available_tokens, 3);

    let repeat = env.service.unlock_alive_deck("u1", target).unwrap();
    assert!(repeat.already_owned);
    assert_eq!(repeat.available_tokens, 3);
}

#[test]
fn test_alive_deck_needs_token() {
    let env = TestEnv::new();
    env.store_progress("u1", &with_alive_decks(999, &[]));
    assert!(matches!(
        env.service.unlock_alive_deck("u1", "aurora_dawn"),
        Err(BowoError::NoTokens)
    ));
    assert!(matches!(
        env.service.unlock_alive_deck("u1", "not_a_deck"),
        Err(BowoError::NotFound(_))
    ));
}

#[test]
fn test_stale_alive_deck_ids_do_not_consume_tokens() {
    let env = TestEnv::new();
    env.store_progress(
        "u1",
        &with_alive_decks(2_000, &["retired_deck", "", "aurora_dawn", "aurora_dawn"]),
    );

    let dto = env.service.get_progress("u1").unwrap();
    assert_eq!(dto.available_alive_tokens, 1);
    assert_eq!(dto.progress.unlocked_alive_decks, vec!["aurora_dawn"]);
}

#[test]
fn test_mini_game_slots() {
    let env = TestEnv::new();

    assert!(matches!(
        env.service.unlock_mini_game("u1", "slot_machine"),
        Err(BowoError::Forbidden(_))
    ));
    assert!(matches!(
        env.service.unlock_mini_game("u1", "tetris"),
        Err(BowoError::NotFound(_))
    ));

    env.service.unlock_trick("u1", "nollie").unwrap();
    env.service.unlock_trick("u1", "manual").unwrap();
    assert_eq!(env.service.get_progress("u1").unwrap().available_mini_game_slots, 1);

    let unlock = env.service.unlock_mini_game("u1", "slot_machine").unwrap();
    assert!(!unlock.already_unlocked);
    assert_eq!(unlock.available_slots, 0);
    assert!(unlock.badges.contains(&"first_mini_game"));

    assert!(env.service.unlock_mini_game("u1", "slot_machine").unwrap().already_unlocked);
    assert!(matches!(
        env.service.unlock_mini_game("u1", "skate_dice"),
        Err(BowoError::Forbidden(_))
    ));
}

#[test]
fn test_shop_purchase_spends_coins_and_equips() {
    let env = TestEnv::new();
    env.store_progress(
        "u1",
        &UserProgress {
            coins: 40,
            ..Default::default()
        },
    );

    assert!(matches!(
        env.service.buy_shop_shape("u1", "shop_neon_orb"),
        Err(BowoError::InsufficientCoins { needed: 50, available: 40 })
    ));
    assert!(matches!(
        env.service.buy_shop_shape("u1", "shop_gold_nope"),
        Err(BowoError::NotFound(_))
    ));

    let mut progress = env.stored("u1");
    progress.coins = 100;
    env.store_progress("u1", &progress);

    let purchase = env.service.buy_shop_shape("u1", "shop_neon_orb").unwrap();
    assert_eq!(purchase.coins_spent, 50);
    assert_eq!(purchase.badges, vec!["first_shop_shape"]);
    // 30 badge XP credits 3 coins
    assert_eq!(purchase.coins_left, 53);

    let shop = env.service.list_shop_shapes("u1").unwrap();
    let orb = shop.items.iter().find(|i| i.id == "shop_neon_orb").unwrap();
    assert!(orb.owned && orb.equipped);
    assert_eq!(shop.shape_avatar_id.as_deref(), Some("shop_neon_orb"));

    let again = env.service.buy_shop_shape("u1", "shop_neon_orb").unwrap();
    assert!(again.already_owned);
    assert_eq!(again.coins_spent, 0);
    assert_eq!(again.coins_left, 53);
}

#[test]
fn test_bubble_chosen_once() {
    let env = TestEnv::new();

    assert!(env.service.list_bubbles("u1").unwrap().offered.is_empty());
    assert!(matches!(
        env.service.choose_bubble("u1", "bubble_fox"),
        Err(BowoError::Forbidden(_))
    ));

    let mut progress = env.stored("u1");
    progress.xp = 100;
    env.store_progress("u1", &progress);
    assert_eq!(env.service.list_bubbles("u1").unwrap().offered.len(), 13);

    let choice = env.service.choose_bubble("u1", "bubble_fox").unwrap();
    assert!(!choice.already_chosen);
    assert_eq!(choice.badges, vec!["bubble_chosen"]);

    assert!(env.service.choose_bubble("u1", "bubble_fox").unwrap().already_chosen);
    assert!(matches!(
        env.service.choose_bubble("u1", "bubble_cat"),
        Err(BowoError::Conflict(_))
    ));
    assert!(env.service.list_bubbles("u1").unwrap().offered.is_empty());
    assert!(matches!(
        env.service.choose_bubble("u1", "bubble_unicorn"),
        Err(BowoError::NotFound(_))
    ));
}

#[test]
fn test_catalog_listings() {
    let env = TestEnv::new();
    env.service.submit_answer("u1", "ollie", 1, "back foot").unwrap();

    let tricks = env.service.list_tricks("u1").unwrap();
    assert_eq!(tricks.len(), 12);
    let ollie = tricks.iter().find(|t| t.trick.id == "ollie").unwrap();
    assert!(ollie.starter);
    assert_eq!(ollie.level, 1);

    let badges = env.service.list_badges("u1").unwrap();
    assert_eq!(badges.len(), 20);
    assert!(badges.iter().all(|b| !b.unlocked));

    assert_eq!(bowo::service::list_levels().len(), 20);
}

#[test]
fn test_admin_reset_xp_keeps_badges() {
    let env = TestEnv::new();
    env.service.unlock_trick("u1", "kickflip").unwrap();

    let dto = env.service.admin_reset_xp("u1").unwrap();
    assert_eq!(dto.progress.xp, 0);
    assert_eq!(dto.level.level, 1);
    assert!(dto.progress.unlocked_badges.contains("first_unlock"));
    assert!(dto.progress.is_trick_unlocked("kickflip"));
}
