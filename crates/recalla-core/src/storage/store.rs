//! Content store - the single write path for topics, words and outcomes

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::backend::{MemoryBackend, Result, StorageBackend, StorageError};
use super::sqlite::SqliteBackend;
use crate::insights::StudyStats;
use crate::mastery::record_outcome_at;
use crate::word::{IdGenerator, NewTopic, NewWord, Topic, UuidIdGenerator, WordRecord};

/// Topics and words over an injected backend
///
/// Outcome recording is serialized through an internal lock, so two
/// near-simultaneous resolutions never race on one word's counters.
pub struct ContentStore<B: StorageBackend> {
    backend: B,
    ids: Box<dyn IdGenerator>,
    outcome_lock: Mutex<()>,
}

impl ContentStore<SqliteBackend> {
    /// Open a SQLite-backed store at `db_path` (or the default location)
    pub fn open(db_path: Option<PathBuf>) -> Result<Self> {
        Ok(Self::new(SqliteBackend::new(db_path)?))
    }
}

impl ContentStore<MemoryBackend> {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: StorageBackend> ContentStore<B> {
    /// Wrap a backend, minting UUID identifiers
    pub fn new(backend: B) -> Self {
        Self::with_id_generator(backend, UuidIdGenerator)
    }

    /// Wrap a backend with a custom identifier source
    pub fn with_id_generator(backend: B, ids: impl IdGenerator + 'static) -> Self {
        Self {
            backend,
            ids: Box::new(ids),
            outcome_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ========================================================================
    // TOPICS
    // ========================================================================

    pub fn create_topic(&self, input: NewTopic) -> Result<Topic> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidInput(
                "topic name must not be empty".into(),
            ));
        }

        let topic = Topic {
            id: self.ids.next_id(),
            name: name.to_string(),
            description: input.description.filter(|d| !d.trim().is_empty()),
            emoji: input.emoji.filter(|e| !e.trim().is_empty()),
            created_at: Utc::now(),
        };
        self.backend.insert_topic(&topic)?;
        tracing::info!(topic_id = %topic.id, name = %topic.name, "Topic created");
        Ok(topic)
    }

    pub fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        self.backend.get_topic(id)
    }

    pub fn list_topics(&self) -> Result<Vec<Topic>> {
        self.backend.list_topics()
    }

    /// Delete a topic together with its words
    pub fn delete_topic(&self, id: &str) -> Result<bool> {
        let deleted = self.backend.delete_topic(id)?;
        if deleted {
            tracing::info!(topic_id = id, "Topic deleted");
        }
        Ok(deleted)
    }

    // ========================================================================
    // WORDS
    // ========================================================================

    /// Add a word with zeroed statistics
    pub fn add_word(&self, input: NewWord) -> Result<WordRecord> {
        let (word, meaning) = input
            .normalized()
            .map_err(|reason| StorageError::InvalidInput(reason.to_string()))?;

        if let Some(topic_id) = input.topic_id.as_deref() {
            if self.backend.get_topic(topic_id)?.is_none() {
                return Err(StorageError::NotFound(format!("topic {topic_id}")));
            }
        }

        let record = WordRecord::new(self.ids.next_id(), word, meaning, input.topic_id);
        self.backend.insert_word(&record)?;
        tracing::debug!(word_id = %record.id, "Word added");
        Ok(record)
    }

    /// Change a word's text, keeping its statistics
    pub fn edit_word(&self, id: &str, word: &str, meaning: &str) -> Result<WordRecord> {
        let (word, meaning) = NewWord::new(word, meaning)
            .normalized()
            .map_err(|reason| StorageError::InvalidInput(reason.to_string()))?;

        let _guard = self.lock_outcomes()?;
        if !self.backend.update_word_text(id, &word, &meaning)? {
            return Err(StorageError::NotFound(format!("word {id}")));
        }
        self.require_word(id)
    }

    pub fn delete_word(&self, id: &str) -> Result<bool> {
        self.backend.delete_word(id)
    }

    pub fn get_word(&self, id: &str) -> Result<Option<WordRecord>> {
        self.backend.get_word(id)
    }

    /// Words of a topic, or every word
    pub fn list_words(&self, topic_id: Option<&str>) -> Result<Vec<WordRecord>> {
        self.backend.list_words(topic_id)
    }

    pub fn count_words(&self, topic_id: Option<&str>) -> Result<usize> {
        self.backend.count_words(topic_id)
    }

    // ========================================================================
    // OUTCOMES
    // ========================================================================

    /// Record one resolved match attempt and persist the new statistics
    pub fn apply_outcome(&self, word_id: &str, is_correct: bool) -> Result<WordRecord> {
        self.apply_outcome_at(word_id, is_correct, Utc::now())
    }

    /// [`Self::apply_outcome`] with an explicit timestamp
    pub fn apply_outcome_at(
        &self,
        word_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<WordRecord> {
        let _guard = self.lock_outcomes()?;

        let current = self.require_word(word_id)?;
        let updated = record_outcome_at(&current, is_correct, now);
        self.persist(&updated)?;

        tracing::debug!(
            word_id,
            is_correct,
            mastery = updated.mastery_score,
            streak = updated.consecutive_correct,
            "Outcome recorded"
        );
        Ok(updated)
    }

    /// Clear a word's statistics
    pub fn reset_progress(&self, word_id: &str) -> Result<WordRecord> {
        let _guard = self.lock_outcomes()?;

        let mut record = self.require_word(word_id)?;
        record.reset_progress();
        self.persist(&record)?;
        tracing::info!(word_id, "Word progress reset");
        Ok(record)
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    /// Progress summary for a topic or the whole collection
    pub fn stats(&self, topic_id: Option<&str>) -> Result<StudyStats> {
        Ok(StudyStats::from_words(&self.backend.list_words(topic_id)?))
    }

    /// Serializes every read-modify-write of a word
    fn lock_outcomes(&self) -> Result<MutexGuard<'_, ()>> {
        self.outcome_lock
            .lock()
            .map_err(|_| StorageError::Init("Outcome lock poisoned".into()))
    }

    fn require_word(&self, id: &str) -> Result<WordRecord> {
        self.backend
            .get_word(id)?
            .ok_or_else(|| StorageError::NotFound(format!("word {id}")))
    }

    fn persist(&self, record: &WordRecord) -> Result<()> {
        if self.backend.update_word(record)? {
            Ok(())
        } else {
            Err(StorageError::NotFound(format!("word {}", record.id)))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
