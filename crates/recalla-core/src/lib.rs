//! # Recalla Core
//!
//! Adaptive word-selection engine for a vocabulary matching game.
//!
//! - **Mastery**: 0-100 score per word built from accuracy, streak and recency
//! - **Difficulty**: error rate with a boost for words missed most recently
//! - **Retention**: exponential forgetting curve whose stability grows with mastery
//! - **Priority**: 0-1000 blend of forgetting, difficulty, mastery gap and overdue state
//! - **Weighted Selection**: priority-proportional sampling without replacement,
//!   with a floor weight so every word stays reachable
//! - **Rounds**: board state machine that refills matched pairs from the pool
//!   until it runs dry
//! - **Insights**: per-word metrics and collection summaries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recalla_core::{ContentStore, NewWord, SelectionOptions, select_words_for_session};
//!
//! // Open storage (uses default platform-specific location)
//! let store = ContentStore::open(None)?;
//!
//! let word = store.add_word(NewWord::new("Hund", "dog"))?;
//!
//! // Record a correct match
//! let updated = store.apply_outcome(&word.id, true)?;
//!
//! // Pick the words for the next board
//! let pool = store.list_words(None)?;
//! let board = select_words_for_session(&pool, 6, &SelectionOptions::default());
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): Compile SQLite into the binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod insights;
pub mod mastery;
pub mod selection;
pub mod session;
pub mod storage;
pub mod word;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Word types
pub use word::{
    IdGenerator, NewTopic, NewWord, SequentialIdGenerator, Topic, UuidIdGenerator, WordRecord,
};

// Mastery model
pub use mastery::{
    calculate_learning_velocity, calculate_next_review_interval, calculate_priority,
    calculate_priority_at, calculate_retention, calculate_retention_at, estimate_difficulty,
    is_overdue_at, record_outcome, record_outcome_at, PriorityBreakdown,
};

// Selection
pub use selection::{
    score_pool_at, select_words_for_session, select_words_for_session_with_rng,
    ScoredCandidate, SelectionOptions,
};

// Rounds
pub use session::{
    MatchResult, Replenishment, ReplenishmentTicket, Round, RoundConfig, RoundError, RoundStatus,
    SlotState, SwapResult,
};

// Insights
pub use insights::{get_word_insights, get_word_insights_at, StudyStats, WordInsights, WordStatus};

// Storage layer
pub use storage::{
    ContentStore, MemoryBackend, Result, SqliteBackend, StorageBackend, StorageError,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        get_word_insights, record_outcome, select_words_for_session, ContentStore, NewTopic,
        NewWord, Result, Round, RoundConfig, SelectionOptions, StorageBackend, StorageError,
        StudyStats, Topic, WordInsights, WordRecord, WordStatus,
    };
}
