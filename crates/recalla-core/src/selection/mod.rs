//! Session Selector
//!
//! Builds the word set for a practice round by weighted sampling without
//! replacement. Each candidate's weight is its priority plus a floor of 15%
//! of the highest priority in the pool, so review leans toward words that
//! need it while every word keeps a real chance of appearing.
//!
//! The drawn set is shuffled before it is returned; presentation order
//! carries no priority signal.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::mastery::{calculate_priority_at, estimate_difficulty};
use crate::word::WordRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Share of the pool's top priority added to every weight
pub const BASE_WEIGHT_FRACTION: f64 = 0.15;

// ============================================================================
// OPTIONS
// ============================================================================

/// Knobs accepted by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionOptions {
    /// Accepted for compatibility; every word is always eligible regardless
    pub include_new: bool,
    /// Add the 15%-of-max weight floor (false = pure priority-proportional)
    pub balance_challenge: bool,
    /// Words with a higher difficulty are excluded before weighting
    pub max_difficulty: u8,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            include_new: true,
            balance_challenge: true,
            max_difficulty: 100,
        }
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// A pool entry with the values the selector weighed it by
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub word: &'a WordRecord,
    pub priority: u32,
    pub difficulty: u8,
    /// Sampling weight (priority plus floor)
    pub weight: f64,
}

/// Score and filter a pool at `now`
///
/// Words above `max_difficulty` are dropped. Weights include the floor only
/// when `balance_challenge` is set.
pub fn score_pool_at<'a>(
    pool: &'a [WordRecord],
    options: &SelectionOptions,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate<'a>> {
    let mut candidates: Vec<ScoredCandidate<'a>> = pool
        .iter()
        .filter_map(|word| {
            let difficulty = estimate_difficulty(word);
            if difficulty > options.max_difficulty {
                return None;
            }
            let priority = calculate_priority_at(word, now);
            Some(ScoredCandidate {
                word,
                priority,
                difficulty,
                weight: priority as f64,
            })
        })
        .collect();

    if options.balance_challenge {
        let max_priority = candidates
            .iter()
            .map(|c| c.priority)
            .max()
            .unwrap_or(0)
            .max(1);
        let base_weight = max_priority as f64 * BASE_WEIGHT_FRACTION;
        for candidate in &mut candidates {
            candidate.weight += base_weight;
        }
    }

    candidates
}

// ============================================================================
// SELECTION
// ============================================================================

/// Select up to `count` words for a session using the thread RNG
pub fn select_words_for_session(
    pool: &[WordRecord],
    count: usize,
    options: &SelectionOptions,
) -> Vec<WordRecord> {
    select_words_for_session_with_rng(pool, count, options, Utc::now(), &mut rand::rng())
}

/// Select up to `count` distinct words from `pool`
///
/// Returns `min(count, filtered pool size)` words in random order. Never
/// fails: an empty pool, a zero count or a fully filtered pool yield an empty
/// list.
pub fn select_words_for_session_with_rng<R: Rng + ?Sized>(
    pool: &[WordRecord],
    count: usize,
    options: &SelectionOptions,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<WordRecord> {
    if count == 0 || pool.is_empty() {
        return Vec::new();
    }

    let mut candidates = score_pool_at(pool, options, now);
    if candidates.is_empty() {
        tracing::debug!(
            pool = pool.len(),
            max_difficulty = options.max_difficulty,
            "No candidates left after difficulty filter"
        );
        return Vec::new();
    }

    let mut selected: Vec<WordRecord> = if candidates.len() <= count {
        candidates.iter().map(|c| c.word.clone()).collect()
    } else {
        let mut drawn = Vec::with_capacity(count);
        let mut total_weight: f64 = candidates.iter().map(|c| c.weight).sum();

        while drawn.len() < count && !candidates.is_empty() {
            let index = draw_index(&candidates, total_weight, rng);
            let chosen = candidates.swap_remove(index);
            total_weight = (total_weight - chosen.weight).max(0.0);
            drawn.push(chosen.word.clone());
        }
        drawn
    };

    selected.shuffle(rng);

    tracing::debug!(
        pool = pool.len(),
        requested = count,
        selected = selected.len(),
        "Selected words for session"
    );

    selected
}

/// Walk the remaining candidates until a uniform draw over the total weight
/// is used up
fn draw_index<R: Rng + ?Sized>(
    candidates: &[ScoredCandidate<'_>],
    total_weight: f64,
    rng: &mut R,
) -> usize {
    // All-zero weights (no floor, zero priorities): uniform
    if total_weight <= 0.0 {
        return rng.random_range(0..candidates.len());
    }

    let mut remaining = rng.random::<f64>() * total_weight;
    for (index, candidate) in candidates.iter().enumerate() {
        remaining -= candidate.weight;
        if remaining < 0.0 {
            return index;
        }
    }

    // Float drift can leave a sliver past the last weight
    candidates
        .iter()
        .rposition(|c| c.weight > 0.0)
        .unwrap_or(candidates.len() - 1)
}

// ============================================================================
// TESTS
// ============================================================================
