//! Word Record - The fundamental unit of vocabulary
//!
//! Each record represents one word/meaning pair with:
//! - Display strings and an optional topic grouping
//! - Practice counters (correct, wrong, current streak)
//! - The derived mastery score committed on every outcome
//!
//! Legacy records may lack the streak or mastery fields; those default to 0
//! once, at deserialization time, so the estimators never have to guess.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// WORD RECORD
// ============================================================================

/// A vocabulary word with its practice statistics
///
/// Owned by the content store. The selection engine only reads records and
/// proposes updated copies through [`crate::mastery::record_outcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    /// Opaque unique identifier
    pub id: String,
    /// The word being learned
    pub word: String,
    /// Its meaning / translation
    pub meaning: String,
    /// Owning topic, if any
    #[serde(default)]
    pub topic_id: Option<String>,

    // ========== Practice counters ==========
    /// Number of correct matches
    #[serde(default)]
    pub correct: u32,
    /// Number of wrong matches
    #[serde(default)]
    pub wrong: u32,
    /// Current run of correct answers, reset on any wrong answer
    #[serde(default)]
    pub consecutive_correct: u32,
    /// When the word was last practiced (milliseconds since epoch on the wire)
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_practiced: Option<DateTime<Utc>>,
    /// Derived mastery in [0, 100]
    #[serde(default)]
    pub mastery_score: u8,

    /// When the word was added
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl WordRecord {
    /// Create a fresh record with zeroed statistics
    pub fn new(
        id: impl Into<String>,
        word: impl Into<String>,
        meaning: impl Into<String>,
        topic_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            meaning: meaning.into(),
            topic_id,
            correct: 0,
            wrong: 0,
            consecutive_correct: 0,
            last_practiced: None,
            mastery_score: 0,
            created_at: Utc::now(),
        }
    }

    /// Total resolved attempts so far
    #[inline]
    pub fn total_attempts(&self) -> u32 {
        self.correct.saturating_add(self.wrong)
    }

    /// Whether any outcome has ever been recorded
    #[inline]
    pub fn has_been_practiced(&self) -> bool {
        self.last_practiced.is_some()
    }

    /// Fraction of attempts answered correctly, `None` before the first attempt
    pub fn accuracy(&self) -> Option<f64> {
        match self.total_attempts() {
            0 => None,
            total => Some(self.correct as f64 / total as f64),
        }
    }

    /// Drop all practice statistics, keeping identity and text
    pub fn reset_progress(&mut self) {
        self.correct = 0;
        self.wrong = 0;
        self.consecutive_correct = 0;
        self.last_practiced = None;
        self.mastery_score = 0;
    }
}

// ============================================================================
// TOPIC
// ============================================================================

/// A named group of words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional emoji shown next to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// When the topic was created
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Input for adding a word
///
/// Uses `deny_unknown_fields` so malformed payloads are rejected instead of
/// silently dropping data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewWord {
    /// The word being learned
    pub word: String,
    /// Its meaning
    pub meaning: String,
    /// Topic to file it under
    #[serde(default)]
    pub topic_id: Option<String>,
}

impl NewWord {
    /// Convenience constructor
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            topic_id: None,
        }
    }

    /// File the word under a topic
    pub fn in_topic(mut self, topic_id: impl Into<String>) -> Self {
        self.topic_id = Some(topic_id.into());
        self
    }

    /// Trim both sides; returns the reason when either is empty
    pub fn normalized(&self) -> Result<(String, String), &'static str> {
        let word = self.word.trim();
        let meaning = self.meaning.trim();
        if word.is_empty() {
            return Err("word must not be empty");
        }
        if meaning.is_empty() {
            return Err("meaning must not be empty");
        }
        Ok((word.to_string(), meaning.to_string()))
    }
}

/// Input for creating a topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTopic {
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional emoji
    #[serde(default)]
    pub emoji: Option<String>,
}

impl NewTopic {
    /// Convenience constructor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
