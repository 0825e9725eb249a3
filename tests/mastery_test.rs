//! Trick mastery flow over a real SQLite store

mod common;

use std::sync::Arc;

use bowo::config::ProgressionSettings;
use bowo::progression::MASTERY_LEVEL;
use bowo::store::ProgressStore;
use bowo::BowoError;
use common::{build_service, FixedClock, FlakyStore, TestEnv};

#[test]
fn test_first_correct_ollie_answer() {
    let env = TestEnv::new();

    let result = env.service.submit_answer("u1", "ollie", 1, "back foot").unwrap();
    assert!(result.correct);
    assert_eq!(result.new_level, 1);
    assert_eq!(result.xp_gained, 20);
    assert_eq!(result.global_progress.progress.xp, 20);

    let stored = env.db.load_trick_progress("u1", "ollie").unwrap().unwrap();
    assert_eq!(stored.level.value(), 1);
    assert!(stored.last_question_at.is_some());
    assert_eq!(env.stored("u1").xp, 20);
}

#[test]
fn test_answer_is_trimmed_and_case_insensitive() {
    let env = TestEnv::new();
    let result = env.service.submit_answer("u1", "ollie", 1, "  Back FOOT ").unwrap();
    assert!(result.correct);
    assert_eq!(result.new_level, 1);
}

#[test]
fn test_in_order_answers_master_once() {
    let env = TestEnv::new();

    let mut masteries = 0;
    for level in 1..=MASTERY_LEVEL {
        let answer = env.answer("ollie", level);
        let result = env.service.submit_answer("u1", "ollie", level, &answer).unwrap();
        assert_eq!(result.new_level, level);
        if result.mastered {
            masteries += 1;
            assert!(result.deck_unlocked.is_some());
            assert!(result.badges.contains(&"first_mastery"));
            // 20 for the answer plus 100 for the badge
            assert_eq!(result.xp_gained, 120);
        }
    }
    assert_eq!(masteries, 1);

    let progress = env.stored("u1");
    assert_eq!(progress.mastered_tricks.len(), 1);
    assert!(progress.mastered_tricks.contains("ollie"));
    assert_eq!(progress.unlocked_decks.len(), 1);
    assert_eq!(progress.xp, 8 * 20 + 100);
    assert_eq!(progress.questions_answered_today, 8);

    // Answering again after mastery changes nothing
    let again = env
        .service
        .submit_answer("u1", "ollie", MASTERY_LEVEL, &env.answer("ollie", MASTERY_LEVEL))
        .unwrap();
    assert!(again.already_mastered);
    assert!(!again.mastered);
    assert_eq!(again.xp_gained, 0);
    assert_eq!(again.deck_unlocked, None);

    let progress = env.stored("u1");
    assert_eq!(progress.unlocked_decks.len(), 1);
    assert_eq!(progress.xp, 260);
}

#[test]
fn test_out_of_order_answer_does_not_advance() {
    let env = TestEnv::new();

    let result = env
        .service
        .submit_answer("u1", "ollie", 3, &env.answer("ollie", 3))
        .unwrap();
    assert!(result.correct);
    assert_eq!(result.new_level, 0);
    assert_eq!(result.expected_level, Some(1));
    assert_eq!(result.xp_gained, 0);

    env.service.submit_answer("u1", "ollie", 1, &env.answer("ollie", 1)).unwrap();
    let repeat = env
        .service
        .submit_answer("u1", "ollie", 1, &env.answer("ollie", 1))
        .unwrap();
    assert_eq!(repeat.new_level, 1);
    assert_eq!(repeat.expected_level, Some(2));
    assert_eq!(env.stored("u1").xp, 20);
}

#[test]
fn test_wrong_answer_keeps_level_but_counts() {
    let env = TestEnv::new();
    let result = env.service.submit_answer("u1", "ollie", 1, "front foot").unwrap();
    assert!(!result.correct);
    assert_eq!(result.new_level, 0);
    assert_eq!(result.xp_gained, 0);
    assert_eq!(env.stored("u1").questions_answered_today, 1);
}

#[test]
fn test_locked_trick_is_forbidden_until_unlocked() {
    let env = TestEnv::new();

    let err = env.service.next_question("u1", "kickflip").unwrap_err();
    assert!(matches!(err, BowoError::Forbidden(_)));
    let err = env
        .service
        .submit_answer("u1", "kickflip", 1, &env.answer("kickflip", 1))
        .unwrap_err();
    assert!(matches!(err, BowoError::Forbidden(_)));

    env.service.unlock_trick("u1", "kickflip").unwrap();
    let next = env.service.next_question("u1", "kickflip").unwrap();
    assert_eq!(next.current_level, 0);
    assert_eq!(next.question.unwrap().level, 1);
}

#[test]
fn test_bad_level_and_unknown_trick() {
    let env = TestEnv::new();
    assert!(matches!(
        env.service.submit_answer("u1", "ollie", 9, "x"),
        Err(BowoError::InvalidLevel(9))
    ));
    assert!(matches!(
        env.service.submit_answer("u1", "ollie", 0, "x"),
        Err(BowoError::InvalidLevel(0))
    ));
    assert!(matches!(
        env.service.next_question("u1", "hardflip_late_bigspin"),
        Err(BowoError::NotFound(_))
    ));
}

#[test]
fn test_next_question_follows_level_and_completes() {
    let env = TestEnv::new();

    let next = env.service.next_question("u1", "ollie").unwrap();
    assert!(!next.is_completed);
    assert_eq!(next.question.as_ref().unwrap().level, 1);

    for level in 1..=MASTERY_LEVEL {
        env.service
            .submit_answer("u1", "ollie", level, &env.answer("ollie", level))
            .unwrap();
    }

    let done = env.service.next_question("u1", "ollie").unwrap();
    assert!(done.is_completed);
    assert_eq!(done.current_level, MASTERY_LEVEL);
    assert!(done.question.is_none());
}

#[test]
fn test_failed_xp_write_is_swallowed() {
    let env = TestEnv::new();
    let flaky = FlakyStore::new(env.db.clone());
    let clock = FixedClock::at(common::start_time());
    let service = build_service(flaky.clone(), ProgressionSettings::default(), clock);

    // The aggregate write goes through, the XP write fails
    flaky.fail_after(1);
    let result = service.submit_answer("u1", "ollie", 1, "back foot").unwrap();
    assert!(result.correct);
    assert_eq!(result.new_level, 1);
    assert_eq!(result.xp_gained, 0);
    assert_eq!(result.global_progress.progress.xp, 0);

    let progress = env.stored("u1");
    assert_eq!(progress.xp, 0);
    assert_eq!(progress.questions_answered_today, 1);
    assert_eq!(
        env.db.load_trick_progress("u1", "ollie").unwrap().unwrap().level.value(),
        1
    );
}

#[test]
fn test_answer_survives_store_outage_after_aggregate_write() {
    let env = TestEnv::new();
    let flaky = FlakyStore::new(env.db.clone());
    let clock = FixedClock::at(common::start_time());
    let service = build_service(flaky.clone(), ProgressionSettings::default(), clock);

    // The aggregate write goes through, then the store stops answering
    flaky.outage_after(1);
    let result = service.submit_answer("u1", "ollie", 1, "back foot").unwrap();
    assert!(result.correct);
    assert_eq!(result.new_level, 1);
    assert_eq!(result.xp_gained, 0);
    assert_eq!(result.global_progress.progress.xp, 0);
    assert_eq!(result.global_progress.progress.questions_answered_today, 1);

    assert_eq!(env.stored("u1").questions_answered_today, 1);
}

#[test]
fn test_failed_aggregate_write_fails_the_answer() {
    let env = TestEnv::new();
    let flaky = FlakyStore::new(env.db.clone());
    let service = build_service(
        Arc::clone(&flaky) as Arc<dyn ProgressStore>,
        ProgressionSettings::default(),
        FixedClock::at(common::start_time()),
    );

    flaky.fail_after(0);
    let err = service.submit_answer("u1", "ollie", 1, "back foot").unwrap_err();
    assert!(err.is_internal());
    // The trick row was already written
    assert_eq!(
        env.db.load_trick_progress("u1", "ollie").unwrap().unwrap().level.value(),
        1
    );
}
