//! Learning journey: a word moves from new to mastered through the store

use chrono::{Duration, Utc};
use recalla_core::mastery::{
    calculate_next_review_interval, calculate_retention, calculate_retention_at,
    estimate_difficulty, is_overdue_at,
};
use recalla_core::{get_word_insights_at, WordStatus};
use recalla_e2e_tests::harness::TestDatabaseManager;

#[test]
fn test_fresh_word_reports_sentinels() {
    let db = TestDatabaseManager::new_temp();
    let id = db.seed_words(1).remove(0);
    let word = db.word(&id);

    assert_eq!(estimate_difficulty(&word), 50);
    assert_eq!(calculate_retention(&word), 0.0);
    assert_eq!(word.mastery_score, 0);

    let insights = get_word_insights_at(&word, Utc::now());
    assert_eq!(insights.status, WordStatus::New);
    assert!(insights.overdue);
    assert!(insights.accuracy.is_none());
}

#[test]
fn test_five_correct_answers_reach_93() {
    let db = TestDatabaseManager::new_temp();
    let id = db.seed_words(1).remove(0);

    let word = db.practice(&id, &[true; 5]);
    assert_eq!(word.correct, 5);
    assert_eq!(word.consecutive_correct, 5);
    assert_eq!(word.mastery_score, 93);

    let stored = db.word(&id);
    assert_eq!(stored, word);
    assert_eq!(WordStatus::classify(&stored), WordStatus::Mastered);
}

#[test]
fn test_miss_resets_streak_and_raises_difficulty() {
    let db = TestDatabaseManager::new_temp();
    let id = db.seed_words(1).remove(0);

    let before = db.practice(&id, &[true, true, true]);
    let after = db.practice(&id, &[false]);

    assert_eq!(after.consecutive_correct, 0);
    assert!(estimate_difficulty(&after) > estimate_difficulty(&before));
    assert!(after.mastery_score < before.mastery_score);
}

#[test]
fn test_retention_decays_and_interval_grows() {
    let db = TestDatabaseManager::new_temp();
    let id = db.seed_words(1).remove(0);
    let early = db.practice(&id, &[true, true]);
    let practiced = early.last_practiced.unwrap();

    let one_hour = calculate_retention_at(&early, practiced + Duration::hours(1));
    let ten_hours = calculate_retention_at(&early, practiced + Duration::hours(10));
    assert!(one_hour > ten_hours);
    assert!(ten_hours > 0.0);

    let later = db.practice(&id, &[true; 6]);
    assert!(calculate_next_review_interval(&later) > calculate_next_review_interval(&early));

    let due_after = calculate_next_review_interval(&later);
    let last = later.last_practiced.unwrap();
    assert!(!is_overdue_at(&later, last));
    assert!(is_overdue_at(&later, last + Duration::minutes((due_after * 60.0) as i64 + 1)));
}

#[test]
fn test_reset_returns_word_to_new() {
    let db = TestDatabaseManager::new_temp();
    let id = db.seed_words(1).remove(0);
    db.practice(&id, &[true, false, true]);

    let reset = db.store.reset_progress(&id).unwrap();
    assert_eq!(reset.total_attempts(), 0);
    assert!(reset.last_practiced.is_none());
    assert_eq!(WordStatus::classify(&db.word(&id)), WordStatus::New);
}

#[test]
fn test_stats_follow_practice() {
    let db = TestDatabaseManager::new_temp();
    let topic = db.seed_topic("German");
    let ids = db.seed_topic_words(&topic.id, 4);
    db.seed_words(2);

    db.practice(&ids[0], &[true; 6]);
    db.practice(&ids[1], &[false, false]);

    let stats = db.store.stats(Some(&topic.id)).unwrap();
    assert_eq!(stats.total_words, 4);
    assert_eq!(stats.new_words, 2);
    assert_eq!(stats.mastered_words, 1);
    assert_eq!(stats.total_correct, 6);
    assert_eq!(stats.total_wrong, 2);

    let all = db.store.stats(None).unwrap();
    assert_eq!(all.total_words, 6);
    assert_eq!(all.new_words, 4);
}
