//! Daily-limited unlocks, ad/purchase stubs and the quiz path

mod common;

use bowo::BowoError;
use common::TestEnv;

#[test]
fn test_daily_limit_and_rollover() {
    let env = TestEnv::new();

    for trick in ["nollie", "manual", "kickflip"] {
        let result = env.service.unlock_trick("u1", trick).unwrap();
        assert!(!result.already_unlocked);
    }
    assert_eq!(env.stored("u1").tricks_unlocked_today, 3);

    let err = env.service.unlock_trick("u1", "heelflip").unwrap_err();
    assert!(matches!(err, BowoError::DailyLimitReached { limit: 3 }));

    // Already unlocked is a success and does not need quota
    let again = env.service.unlock_trick("u1", "manual").unwrap();
    assert!(again.already_unlocked);
    assert_eq!(again.xp_gained, 0);

    env.clock.advance_days(1);
    let next_day = env.service.unlock_trick("u1", "heelflip").unwrap();
    assert!(!next_day.already_unlocked);
    assert_eq!(next_day.tricks_unlocked_today, 1);
}

#[test]
fn test_unlock_quota_resets_at_utc_midnight() {
    let env = TestEnv::new();
    env.clock.set(common::utc(4, 23, 50));

    for trick in ["nollie", "manual", "kickflip"] {
        env.service.unlock_trick("u1", trick).unwrap();
    }
    let err = env.service.unlock_trick("u1", "heelflip").unwrap_err();
    assert!(matches!(err, BowoError::DailyLimitReached { .. }));

    // Twenty minutes later is a new UTC day
    env.clock.set(common::utc(5, 0, 10));
    let result = env.service.unlock_trick("u1", "heelflip").unwrap();
    assert!(!result.already_unlocked);
    assert_eq!(result.tricks_unlocked_today, 1);
    assert_eq!(
        env.stored("u1").last_unlock_date_utc,
        Some(common::utc(5, 0, 10).date_naive())
    );
}

#[test]
fn test_unlock_quota_holds_until_midnight() {
    let env = TestEnv::new();
    env.clock.set(common::utc(5, 0, 1));

    for trick in ["nollie", "manual", "kickflip"] {
        env.service.unlock_trick("u1", trick).unwrap();
    }

    env.clock.set(common::utc(5, 23, 59));
    let err = env.service.unlock_trick("u1", "heelflip").unwrap_err();
    assert!(matches!(err, BowoError::DailyLimitReached { limit: 3 }));
    assert_eq!(env.service.get_progress("u1").unwrap().daily_unlocks_remaining, 0);
    assert_eq!(env.stored("u1").tricks_unlocked_today, 3);
}

#[test]
fn test_first_unlock_grants_xp_and_badge() {
    let env = TestEnv::new();
    let result = env.service.unlock_trick("u1", "kickflip").unwrap();
    assert_eq!(result.badges, vec!["first_unlock"]);
    assert_eq!(result.xp_gained, 120 + 25);

    let progress = env.stored("u1");
    assert_eq!(progress.xp, 145);
    assert!(progress.is_trick_unlocked("kickflip"));
    assert_eq!(progress.coins, 14);
}

#[test]
fn test_unknown_trick_not_found() {
    let env = TestEnv::new();
    assert!(matches!(
        env.service.unlock_trick("u1", "impossible"),
        Err(BowoError::NotFound(_))
    ));
}

#[test]
fn test_ad_and_purchase_stubs() {
    let env = TestEnv::new();

    assert!(matches!(
        env.service.ad_reward("u1", "kickflip", "   "),
        Err(BowoError::InvalidInput(_))
    ));
    assert!(matches!(
        env.service.validate_purchase("u1", "kickflip", ""),
        Err(BowoError::InvalidInput(_))
    ));

    assert!(!env.service.ad_reward("u1", "kickflip", "ad-123").unwrap().already_unlocked);
    env.service.validate_purchase("u1", "heelflip", "receipt").unwrap();
    env.service.ad_reward("u1", "manual", "ad-456").unwrap();

    // Stubs go through the same daily quota
    assert!(matches!(
        env.service.validate_purchase("u1", "boardslide", "receipt"),
        Err(BowoError::DailyLimitReached { .. })
    ));
}

#[test]
fn test_quiz_wrong_then_right() {
    let env = TestEnv::new();
    let correct = env
        .service
        .content()
        .quizzes
        .get("kickflip")
        .unwrap()
        .correct_index;
    let wrong = (correct + 1) % 4;

    let quiz = env.service.get_quiz("u1", "kickflip").unwrap();
    assert_eq!(quiz.attempts, 0);
    assert_eq!(quiz.quiz.answers.len(), 4);

    let miss = env.service.validate_quiz("u1", "kickflip", wrong).unwrap();
    assert!(!miss.correct);
    assert_eq!(miss.attempts, 1);
    let miss = env.service.validate_quiz("u1", "kickflip", wrong).unwrap();
    assert_eq!(miss.attempts, 2);
    assert_eq!(env.service.get_quiz("u1", "kickflip").unwrap().attempts, 2);

    let win = env.service.validate_quiz("u1", "kickflip", correct).unwrap();
    assert!(win.correct);
    assert!(!win.already_unlocked);
    assert_eq!(win.xp_gained, 50 + 40 + 25);
    assert!(win.badges.contains(&"first_quiz_win"));
    assert!(win.badges.contains(&"first_unlock"));

    let progress = env.stored("u1");
    assert!(progress.is_trick_unlocked("kickflip"));
    // Quiz unlocks do not use the daily quota
    assert_eq!(progress.tricks_unlocked_today, 0);

    let repeat = env.service.validate_quiz("u1", "kickflip", correct).unwrap();
    assert!(repeat.already_unlocked);
    assert_eq!(repeat.xp_gained, 0);
}

#[test]
fn test_quiz_view_hides_key_and_unknown_quiz() {
    let env = TestEnv::new();
    let quiz = env.service.get_quiz("u1", "ollie").unwrap();
    let json = serde_json::to_value(&quiz).unwrap();
    assert!(json.get("correctIndex").is_none());
    assert_eq!(json["trickId"], "ollie");

    assert!(matches!(
        env.service.get_quiz("u1", "no_such_trick"),
        Err(BowoError::NotFound(_))
    ));
}

#[test]
fn test_admin_reset_quiz() {
    let env = TestEnv::new();
    let correct = env.service.content().quizzes.get("nollie").unwrap().correct_index;
    env.service.validate_quiz("u1", "nollie", (correct + 1) % 4).unwrap();
    env.service.validate_quiz("u1", "kickflip", 99).unwrap();

    assert_eq!(env.service.admin_reset_quiz("u1", Some("nollie")).unwrap(), 1);
    assert_eq!(env.stored("u1").quiz_attempts.len(), 1);
    assert_eq!(env.service.admin_reset_quiz("u1", None).unwrap(), 1);
    assert!(env.stored("u1").quiz_attempts.is_empty());

    assert!(matches!(
        env.service.admin_reset_quiz("ghost", None),
        Err(BowoError::NotFound(_))
    ));
}
