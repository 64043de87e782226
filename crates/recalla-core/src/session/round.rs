//! Round controller state machine

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::selection::{select_words_for_session_with_rng, SelectionOptions};
use crate::word::WordRecord;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Round tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundConfig {
    /// Pairs shown on the board at once
    pub board_pairs: usize,
    /// Smallest pool a round can start from
    pub min_pairs_to_start: usize,
    /// Lower bound of the replacement delay
    pub min_replenish_delay_ms: u64,
    /// Upper bound of the replacement delay
    pub max_replenish_delay_ms: u64,
    /// Points per correct match
    pub points_per_match: u32,
    /// Points awarded when the whole pool has been cleared
    pub completion_bonus: u32,
    /// Options passed to the selector for the board and every replacement
    pub selection: SelectionOptions,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            board_pairs: 6,
            min_pairs_to_start: 4,
            min_replenish_delay_ms: 200,
            max_replenish_delay_ms: 600,
            points_per_match: 10,
            completion_bonus: 50,
            selection: SelectionOptions::default(),
        }
    }
}

/// Errors starting a round
#[non_exhaustive]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoundError {
    /// The pool is too small to play
    #[error("Not enough words to start a round: {available} available, {required} required")]
    NotEnoughWords { available: usize, required: usize },
    /// Every word was excluded by the selection options
    #[error("No eligible words after applying selection options")]
    NoEligibleWords,
}

// ============================================================================
// STATE
// ============================================================================

/// One pair position on the board
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    /// Both cards of `word` are face up and unmatched
    Active(WordRecord),
    /// The pair was matched; `incoming` is already marked shown and waits to
    /// be swapped in
    AwaitingReplenishment {
        matched_word_id: String,
        incoming: WordRecord,
    },
    /// Matched with nothing left to replace it
    Cleared,
}

/// Everything the caller needs to perform a delayed card swap
#[derive(Debug, Clone, PartialEq)]
pub struct ReplenishmentTicket {
    pub slot: usize,
    pub matched_word_id: String,
    pub incoming: WordRecord,
    /// How long to wait before calling [`Round::complete_replenishment`]
    pub delay: Duration,
}

/// What happened after a pair was matched
#[derive(Debug, Clone, PartialEq)]
pub enum Replenishment {
    /// A replacement was drawn
    Scheduled(ReplenishmentTicket),
    /// No unseen words remain; the slot was cleared
    PoolExhausted { round_complete: bool },
    /// The pair is not on the board any more
    Stale,
}

/// Result of a delayed swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapResult {
    Swapped { slot: usize, word_id: String },
    Stale,
}

/// Outcome of one resolved match attempt
///
/// The caller records `is_correct` against `word_id` in the content store.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub word_id: String,
    pub is_correct: bool,
    /// Present for correct matches only
    pub replenishment: Option<Replenishment>,
}

/// Whether the round is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RoundStatus {
    InProgress,
    Completed { score: u32, bonus: u32 },
}

// ============================================================================
// ROUND
// ============================================================================

/// A running practice round
#[derive(Debug, Clone)]
pub struct Round {
    config: RoundConfig,
    slots: Vec<SlotState>,
    available: Vec<WordRecord>,
    shown: HashSet<String>,
    matches: u32,
    mistakes: u32,
    score: u32,
    status: RoundStatus,
}

impl Round {
    /// Draw the initial board from `pool`
    pub fn start<R: Rng + ?Sized>(
        pool: Vec<WordRecord>,
        config: RoundConfig,
        rng: &mut R,
    ) -> Result<Self, RoundError> {
        if pool.len() < config.min_pairs_to_start {
            return Err(RoundError::NotEnoughWords {
                available: pool.len(),
                required: config.min_pairs_to_start,
            });
        }

        let board = select_words_for_session_with_rng(
            &pool,
            config.board_pairs,
            &config.selection,
            Utc::now(),
            rng,
        );
        if board.is_empty() {
            return Err(RoundError::NoEligibleWords);
        }

        let shown: HashSet<String> = board.iter().map(|w| w.id.clone()).collect();
        let available: Vec<WordRecord> =
            pool.into_iter().filter(|w| !shown.contains(&w.id)).collect();

        tracing::debug!(
            board = board.len(),
            remaining = available.len(),
            "Round started"
        );

        Ok(Self {
            config,
            slots: board.into_iter().map(SlotState::Active).collect(),
            available,
            shown,
            matches: 0,
            mistakes: 0,
            score: 0,
            status: RoundStatus::InProgress,
        })
    }

    /// Current board
    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    /// Words currently face up and unmatched, with their slot index
    pub fn active_words(&self) -> impl Iterator<Item = (usize, &WordRecord)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            SlotState::Active(word) => Some((i, word)),
            _ => None,
        })
    }

    /// IDs shown so far this session
    pub fn shown_word_ids(&self) -> &HashSet<String> {
        &self.shown
    }

    /// Words not yet shown
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Replace the cached copy of a word after its outcome was persisted
    ///
    /// Keeps later replacement draws weighted by fresh statistics.
    pub fn refresh_word(&mut self, record: &WordRecord) {
        if let Some(word) = self.available.iter_mut().find(|w| w.id == record.id) {
            *word = record.clone();
            return;
        }
        for slot in &mut self.slots {
            if let SlotState::Active(word) = slot {
                if word.id == record.id {
                    *word = record.clone();
                }
            }
        }
    }

    /// Resolve the player pairing the word card of `word_id` with the meaning
    /// card of `meaning_word_id`
    ///
    /// Returns `None` when the word card is not face up (stale input).
    pub fn attempt_match<R: Rng + ?Sized>(
        &mut self,
        word_id: &str,
        meaning_word_id: &str,
        rng: &mut R,
    ) -> Option<MatchResult> {
        if self.status != RoundStatus::InProgress || self.active_slot_of(word_id).is_none() {
            tracing::debug!(word_id, "Ignoring match attempt for a card not on the board");
            return None;
        }

        if word_id != meaning_word_id {
            self.mistakes += 1;
            return Some(MatchResult {
                word_id: word_id.to_string(),
                is_correct: false,
                replenishment: None,
            });
        }

        self.matches += 1;
        self.score += self.config.points_per_match;
        let replenishment = self.on_pair_matched(word_id, rng);

        Some(MatchResult {
            word_id: word_id.to_string(),
            is_correct: true,
            replenishment: Some(replenishment),
        })
    }

    /// Draw a replacement for the matched pair of `word_id`
    ///
    /// The incoming word is marked shown before it becomes visible.
    pub fn on_pair_matched<R: Rng + ?Sized>(
        &mut self,
        word_id: &str,
        rng: &mut R,
    ) -> Replenishment {
        let Some(slot) = self.active_slot_of(word_id) else {
            tracing::debug!(word_id, "Matched pair no longer on the board; skipping replenishment");
            return Replenishment::Stale;
        };

        let drawn = select_words_for_session_with_rng(
            &self.available,
            1,
            &self.config.selection,
            Utc::now(),
            rng,
        );

        let Some(incoming) = drawn.into_iter().next() else {
            self.slots[slot] = SlotState::Cleared;
            let round_complete = self.finish_if_cleared();
            tracing::debug!(word_id, round_complete, "Word pool exhausted");
            return Replenishment::PoolExhausted { round_complete };
        };

        self.available.retain(|w| w.id != incoming.id);
        self.shown.insert(incoming.id.clone());
        self.slots[slot] = SlotState::AwaitingReplenishment {
            matched_word_id: word_id.to_string(),
            incoming: incoming.clone(),
        };

        let delay = self.replenish_delay(rng);
        tracing::debug!(
            slot,
            matched = word_id,
            incoming = %incoming.id,
            delay_ms = delay.as_millis() as u64,
            "Replenishment scheduled"
        );

        Replenishment::Scheduled(ReplenishmentTicket {
            slot,
            matched_word_id: word_id.to_string(),
            incoming,
            delay,
        })
    }

    /// Swap the ticket's incoming word onto the board
    pub fn complete_replenishment(&mut self, ticket: &ReplenishmentTicket) -> SwapResult {
        let pending = match self.slots.get(ticket.slot) {
            Some(SlotState::AwaitingReplenishment {
                matched_word_id,
                incoming,
            }) => *matched_word_id == ticket.matched_word_id && incoming.id == ticket.incoming.id,
            _ => false,
        };

        if !pending {
            tracing::debug!(slot = ticket.slot, "Stale replenishment ticket ignored");
            return SwapResult::Stale;
        }

        let incoming = ticket.incoming.clone();
        let word_id = incoming.id.clone();
        self.slots[ticket.slot] = SlotState::Active(incoming);
        SwapResult::Swapped {
            slot: ticket.slot,
            word_id,
        }
    }

    fn active_slot_of(&self, word_id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, SlotState::Active(word) if word.id == word_id))
    }

    fn replenish_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let low = self.config.min_replenish_delay_ms;
        let high = self.config.max_replenish_delay_ms.max(low);
        Duration::from_millis(rng.random_range(low..=high))
    }

    fn finish_if_cleared(&mut self) -> bool {
        let cleared = self.slots.iter().all(|s| matches!(s, SlotState::Cleared));
        if cleared && self.status == RoundStatus::InProgress {
            let bonus = self.config.completion_bonus;
            self.score += bonus;
            self.status = RoundStatus::Completed {
                score: self.score,
                bonus,
            };
            tracing::info!(score = self.score, matches = self.matches, "Round completed");
        }
        cleared
    }
}

// ============================================================================
// TESTS
// ============================================================================
