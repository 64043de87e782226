//! Storage backend abstraction and the in-memory implementation

use std::sync::Mutex;

use crate::word::{Topic, WordRecord};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Rejected input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// BACKEND TRAIT
// ============================================================================

/// Persistence for topics and words
///
/// Implementations take `&self` and handle their own interior locking so a
/// store can be shared behind an `Arc`. Deleting a topic deletes its words.
pub trait StorageBackend: Send + Sync {
    fn insert_topic(&self, topic: &Topic) -> Result<()>;

    fn get_topic(&self, id: &str) -> Result<Option<Topic>>;

    /// All topics, oldest first
    fn list_topics(&self) -> Result<Vec<Topic>>;

    /// Delete a topic and every word filed under it
    fn delete_topic(&self, id: &str) -> Result<bool>;

    fn insert_word(&self, word: &WordRecord) -> Result<()>;

    fn get_word(&self, id: &str) -> Result<Option<WordRecord>>;

    /// Words of one topic, or all words when `topic_id` is `None`; oldest first
    fn list_words(&self, topic_id: Option<&str>) -> Result<Vec<WordRecord>>;

    /// Overwrite a stored word; `false` if it does not exist
    fn update_word(&self, word: &WordRecord) -> Result<bool>;

    /// Replace only the display text of a word, leaving its statistics alone
    fn update_word_text(&self, id: &str, word: &str, meaning: &str) -> Result<bool>;

    fn delete_word(&self, id: &str) -> Result<bool>;

    fn count_words(&self, topic_id: Option<&str>) -> Result<usize> {
        Ok(self.list_words(topic_id)?.len())
    }
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    topics: Vec<Topic>,
    words: Vec<WordRecord>,
}

/// Volatile backend for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StorageError::Init("Memory state lock poisoned".into()))
    }
}

impl StorageBackend for MemoryBackend {
    fn insert_topic(&self, topic: &Topic) -> Result<()> {
        let mut state = self.lock()?;
        if state.topics.iter().any(|t| t.id == topic.id) {
            return Err(StorageError::InvalidInput(format!(
                "duplicate topic id {}",
                topic.id
            )));
        }
        state.topics.push(topic.clone());
        Ok(())
    }

    fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        Ok(self.lock()?.topics.iter().find(|t| t.id == id).cloned())
    }

    fn list_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.lock()?.topics.clone())
    }

    fn delete_topic(&self, id: &str) -> Result<bool> {
        let mut state = self.lock()?;
        let before = state.topics.len();
        state.topics.retain(|t| t.id != id);
        if state.topics.len() == before {
            return Ok(false);
        }
        state.words.retain(|w| w.topic_id.as_deref() != Some(id));
        Ok(true)
    }

    fn insert_word(&self, word: &WordRecord) -> Result<()> {
        let mut state = self.lock()?;
        if state.words.iter().any(|w| w.id == word.id) {
            return Err(StorageError::InvalidInput(format!(
                "duplicate word id {}",
                word.id
            )));
        }
        state.words.push(word.clone());
        Ok(())
    }

    fn get_word(&self, id: &str) -> Result<Option<WordRecord>> {
        Ok(self.lock()?.words.iter().find(|w| w.id == id).cloned())
    }

    fn list_words(&self, topic_id: Option<&str>) -> Result<Vec<WordRecord>> {
        let state = self.lock()?;
        Ok(state
            .words
            .iter()
            .filter(|w| topic_id.is_none() || w.topic_id.as_deref() == topic_id)
            .cloned()
            .collect())
    }

    fn update_word(&self, word: &WordRecord) -> Result<bool> {
        let mut state = self.lock()?;
        match state.words.iter_mut().find(|w| w.id == word.id) {
            Some(existing) => {
                *existing = word.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_word_text(&self, id: &str, word: &str, meaning: &str) -> Result<bool> {
        let mut state = self.lock()?;
        match state.words.iter_mut().find(|w| w.id == id) {
            Some(existing) => {
                existing.word = word.to_string();
                existing.meaning = meaning.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_word(&self, id: &str) -> Result<bool> {
        let mut state = self.lock()?;
        let before = state.words.len();
        state.words.retain(|w| w.id != id);
        Ok(state.words.len() < before)
    }
}
