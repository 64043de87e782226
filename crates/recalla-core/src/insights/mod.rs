//! # Word Insights
//!
//! Read-only summaries for display. Nothing here feeds back into selection.
//!
//! First matching rule wins:
//!
//! | Status      | Rule                                   |
//! |-------------|----------------------------------------|
//! | Mastered    | mastery >= 80                          |
//! | Familiar    | mastery 60-79                          |
//! | Challenging | difficulty >= 70 and mastery < 60      |
//! | New         | never practiced                        |
//! | Learning    | everything else                        |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mastery::{
    calculate_learning_velocity, calculate_next_review_interval, calculate_priority_at,
    calculate_retention_at, estimate_difficulty, is_overdue_at,
};
use crate::word::WordRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Mastery at or above which a word counts as mastered
pub const MASTERED_THRESHOLD: u8 = 80;

/// Mastery at or above which a word counts as familiar
pub const FAMILIAR_THRESHOLD: u8 = 60;

/// Difficulty at or above which an unmastered word counts as challenging
pub const CHALLENGING_DIFFICULTY: u8 = 70;

// ============================================================================
// STATUS
// ============================================================================

/// Display classification of a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    New,
    Learning,
    Challenging,
    Familiar,
    Mastered,
}

impl WordStatus {
    /// Classify a record
    ///
    /// Rules apply in table order, so a legacy record carrying counters but
    /// no practice timestamp is still judged on its mastery and difficulty.
    pub fn classify(word: &WordRecord) -> Self {
        let mastery = word.mastery_score;
        if mastery >= MASTERED_THRESHOLD {
            WordStatus::Mastered
        } else if mastery >= FAMILIAR_THRESHOLD {
            WordStatus::Familiar
        } else if estimate_difficulty(word) >= CHALLENGING_DIFFICULTY {
            WordStatus::Challenging
        } else if !word.has_been_practiced() {
            WordStatus::New
        } else {
            WordStatus::Learning
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::New => "new",
            WordStatus::Learning => "learning",
            WordStatus::Challenging => "challenging",
            WordStatus::Familiar => "familiar",
            WordStatus::Mastered => "mastered",
        }
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            WordStatus::New => "Not practiced yet",
            WordStatus::Learning => "Being learned",
            WordStatus::Challenging => "Frequently missed, needs extra review",
            WordStatus::Familiar => "Mostly known",
            WordStatus::Mastered => "Well learned",
        }
    }
}

impl std::fmt::Display for WordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PER-WORD INSIGHTS
// ============================================================================

/// Everything the insights view shows for one word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInsights {
    pub word_id: String,
    pub status: WordStatus,
    pub mastery_score: u8,
    pub difficulty: u8,
    /// Current recall likelihood (0.0 - 1.0)
    pub retention: f64,
    pub next_review_hours: f64,
    pub learning_velocity: i32,
    pub priority: u32,
    pub overdue: bool,
    /// `None` before the first attempt
    pub accuracy: Option<f64>,
}

/// Insights for `word` right now
pub fn get_word_insights(word: &WordRecord) -> WordInsights {
    get_word_insights_at(word, Utc::now())
}

/// Insights for `word` at `now`
pub fn get_word_insights_at(word: &WordRecord, now: DateTime<Utc>) -> WordInsights {
    WordInsights {
        word_id: word.id.clone(),
        status: WordStatus::classify(word),
        mastery_score: word.mastery_score,
        difficulty: estimate_difficulty(word),
        retention: calculate_retention_at(word, now),
        next_review_hours: calculate_next_review_interval(word),
        learning_velocity: calculate_learning_velocity(word),
        priority: calculate_priority_at(word, now),
        overdue: is_overdue_at(word, now),
        accuracy: word.accuracy(),
    }
}

// ============================================================================
// AGGREGATE STATISTICS
// ============================================================================

/// Progress summary over a set of words
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_words: usize,
    pub new_words: usize,
    pub learning_words: usize,
    pub challenging_words: usize,
    pub familiar_words: usize,
    pub mastered_words: usize,
    /// Practiced words past their review interval
    pub overdue_words: usize,
    pub average_mastery: f64,
    /// Average over practiced words only
    pub average_retention: f64,
    pub total_correct: u64,
    pub total_wrong: u64,
    /// `None` before any attempt
    pub accuracy: Option<f64>,
}

impl StudyStats {
    /// Summarize `words` at `now`
    pub fn from_words_at(words: &[WordRecord], now: DateTime<Utc>) -> Self {
        let mut stats = StudyStats {
            total_words: words.len(),
            ..Default::default()
        };

        let mut mastery_sum = 0.0;
        let mut retention_sum = 0.0;
        let mut practiced = 0usize;

        for word in words {
            match WordStatus::classify(word) {
                WordStatus::New => stats.new_words += 1,
                WordStatus::Learning => stats.learning_words += 1,
                WordStatus::Challenging => stats.challenging_words += 1,
                WordStatus::Familiar => stats.familiar_words += 1,
                WordStatus::Mastered => stats.mastered_words += 1,
            }

            mastery_sum += word.mastery_score as f64;
            stats.total_correct += word.correct as u64;
            stats.total_wrong += word.wrong as u64;

            if word.has_been_practiced() {
                practiced += 1;
                retention_sum += calculate_retention_at(word, now);
                if is_overdue_at(word, now) {
                    stats.overdue_words += 1;
                }
            }
        }

        if !words.is_empty() {
            stats.average_mastery = mastery_sum / words.len() as f64;
        }
        if practiced > 0 {
            stats.average_retention = retention_sum / practiced as f64;
        }
        let attempts = stats.total_correct + stats.total_wrong;
        if attempts > 0 {
            stats.accuracy = Some(stats.total_correct as f64 / attempts as f64);
        }

        stats
    }

    /// Summarize `words` right now
    pub fn from_words(words: &[WordRecord]) -> Self {
        Self::from_words_at(words, Utc::now())
    }
}

// ============================================================================
// TESTS
// ============================================================================
