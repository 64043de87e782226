//! Round journey: a full game against a persistent store

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use recalla_core::{
    Replenishment, Round, RoundConfig, RoundError, RoundStatus, SlotState, SwapResult,
};
use recalla_e2e_tests::harness::TestDatabaseManager;

fn board_config(pairs: usize) -> RoundConfig {
    RoundConfig {
        board_pairs: pairs,
        ..RoundConfig::default()
    }
}

#[test]
fn test_round_clears_whole_pool_and_persists_outcomes() {
    let db = TestDatabaseManager::new_temp();
    let topic = db.seed_topic("Animals");
    db.seed_topic_words(&topic.id, 10);
    let pool = db.store.list_words(Some(&topic.id)).unwrap();

    let mut rng = StdRng::seed_from_u64(99);
    let mut round = Round::start(pool, board_config(4), &mut rng).unwrap();
    let mut matched = HashSet::new();

    // One wrong pairing first
    let ids: Vec<String> = round.active_words().map(|(_, w)| w.id.clone()).collect();
    let miss = round.attempt_match(&ids[0], &ids[1], &mut rng).unwrap();
    assert!(!miss.is_correct);
    let updated = db.store.apply_outcome(&miss.word_id, false).unwrap();
    round.refresh_word(&updated);

    while round.status() == RoundStatus::InProgress {
        let (_, word) = round.active_words().next().expect("board has an active word");
        let id = word.id.clone();
        let result = round.attempt_match(&id, &id, &mut rng).unwrap();
        assert!(result.is_correct);
        assert!(matched.insert(id.clone()), "word {id} shown twice");

        let updated = db.store.apply_outcome(&id, true).unwrap();
        round.refresh_word(&updated);

        if let Some(Replenishment::Scheduled(ticket)) = result.replenishment {
            assert!(!matched.contains(&ticket.incoming.id));
            assert_eq!(
                round.complete_replenishment(&ticket),
                SwapResult::Swapped {
                    slot: ticket.slot,
                    word_id: ticket.incoming.id.clone(),
                }
            );
        }
    }

    assert_eq!(matched.len(), 10);
    assert_eq!(round.shown_word_ids().len(), 10);
    assert_eq!(round.mistakes(), 1);
    assert_eq!(
        round.status(),
        RoundStatus::Completed {
            score: 150,
            bonus: 50
        }
    );
    assert!(round.slots().iter().all(|s| matches!(s, SlotState::Cleared)));

    let stats = db.store.stats(Some(&topic.id)).unwrap();
    assert_eq!(stats.total_correct, 10);
    assert_eq!(stats.total_wrong, 1);
    assert_eq!(stats.new_words, 0);
}

#[test]
fn test_duplicate_ticket_is_stale() {
    let db = TestDatabaseManager::new_temp();
    db.seed_words(8);
    let pool = db.store.list_words(None).unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let mut round = Round::start(pool, board_config(4), &mut rng).unwrap();
    let id = round.active_words().next().map(|(_, w)| w.id.clone()).unwrap();

    let result = round.attempt_match(&id, &id, &mut rng).unwrap();
    let Some(Replenishment::Scheduled(ticket)) = result.replenishment else {
        panic!("expected a scheduled replenishment");
    };

    assert!(ticket.delay.as_millis() >= 200 && ticket.delay.as_millis() <= 600);
    assert!(matches!(round.complete_replenishment(&ticket), SwapResult::Swapped { .. }));
    assert_eq!(round.complete_replenishment(&ticket), SwapResult::Stale);

    // The matched card is gone, so a late repeat is ignored
    assert!(round.attempt_match(&id, &id, &mut rng).is_none());
    assert!(matches!(round.on_pair_matched(&id, &mut rng), Replenishment::Stale));
}

#[test]
fn test_small_pool_cannot_start() {
    let db = TestDatabaseManager::new_temp();
    db.seed_words(3);
    let pool = db.store.list_words(None).unwrap();

    let mut rng = StdRng::seed_from_u64(1);
    let err = Round::start(pool, RoundConfig::default(), &mut rng).unwrap_err();
    assert_eq!(
        err,
        RoundError::NotEnoughWords {
            available: 3,
            required: 4
        }
    );
}
