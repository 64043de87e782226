//! Selection journey: the selector over pools loaded from storage

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use recalla_core::mastery::{calculate_priority_at, estimate_difficulty};
use recalla_core::{select_words_for_session, select_words_for_session_with_rng, SelectionOptions};
use recalla_e2e_tests::harness::TestDatabaseManager;
use recalla_e2e_tests::mocks::{BatchConfig, TestDataFactory};

#[test]
fn test_four_of_ten_are_unique_pool_members() {
    let db = TestDatabaseManager::new_temp();
    db.seed_words(10);
    let pool = db.store.list_words(None).unwrap();
    let pool_ids: HashSet<&str> = pool.iter().map(|w| w.id.as_str()).collect();

    for _ in 0..50 {
        let picked = select_words_for_session(&pool, 4, &SelectionOptions::default());
        assert_eq!(picked.len(), 4);
        let ids: HashSet<&str> = picked.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        assert!(ids.is_subset(&pool_ids));
    }
}

#[test]
fn test_topic_pool_only() {
    let db = TestDatabaseManager::new_temp();
    let topic = db.seed_topic("Spanish");
    db.seed_topic_words(&topic.id, 5);
    db.seed_words(20);

    let pool = db.store.list_words(Some(&topic.id)).unwrap();
    let picked = select_words_for_session(&pool, 8, &SelectionOptions::default());
    assert_eq!(picked.len(), 5);
    assert!(picked.iter().all(|w| w.topic_id.as_deref() == Some(topic.id.as_str())));
}

#[test]
fn test_priority_orders_practice_profiles() {
    let now = Utc::now();
    let scenario = TestDataFactory::mixed_pool(now, 0);
    let priority = |label: &str| {
        let word = scenario.words.iter().find(|w| w.id == scenario.id_of(label)).unwrap();
        calculate_priority_at(word, now)
    };

    assert!(priority("struggling") > priority("mastered"));
    assert!(priority("stale") > priority("mastered"));
    assert!(priority("fresh") > priority("mastered"));
}

#[test]
fn test_struggling_words_drawn_more_often() {
    let now = Utc::now();
    let scenario = TestDataFactory::mixed_pool(now, 0);
    let options = SelectionOptions::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..5_000 {
        let picked = select_words_for_session_with_rng(&scenario.words, 1, &options, now, &mut rng);
        *counts.entry(picked[0].id.clone()).or_default() += 1;
    }

    let struggling = counts.get("struggling").copied().unwrap_or(0);
    let mastered = counts.get("mastered").copied().unwrap_or(0);
    assert!(mastered > 0, "floor weight keeps mastered words reachable");
    assert!(struggling > mastered * 2);
}

#[test]
fn test_max_difficulty_excludes_hard_words() {
    let now = Utc::now();
    let mut pool = TestDataFactory::create_batch(
        &BatchConfig {
            count: 6,
            prefix: "easy".into(),
            history: vec![true, true, true],
            ..Default::default()
        },
        now,
    );
    pool.extend(TestDataFactory::create_batch(
        &BatchConfig {
            count: 6,
            prefix: "hard".into(),
            history: vec![false, false, false],
            ..Default::default()
        },
        now,
    ));

    let options = SelectionOptions {
        max_difficulty: 60,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let picked = select_words_for_session_with_rng(&pool, 4, &options, now, &mut rng);
        assert_eq!(picked.len(), 4);
        assert!(picked.iter().all(|w| estimate_difficulty(w) <= 60));
        assert!(picked.iter().all(|w| w.id.starts_with("easy")));
    }
}

#[test]
fn test_degenerate_requests_return_empty() {
    let db = TestDatabaseManager::new_temp();
    let options = SelectionOptions::default();
    assert!(select_words_for_session(&[], 4, &options).is_empty());

    db.seed_words(3);
    let pool = db.store.list_words(None).unwrap();
    assert!(select_words_for_session(&pool, 0, &options).is_empty());
}
