//! Test Database Manager
//!
//! Provides isolated database instances for testing:
//! - Temporary SQLite stores that are cleaned up on drop
//! - Seeding helpers for topics and words
//! - Reopening the same file to check persistence

use std::path::PathBuf;

use recalla_core::{ContentStore, NewTopic, NewWord, SqliteBackend, Topic, WordRecord};
use tempfile::TempDir;

/// Manager for test databases
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
/// let ids = db.seed_words(10);
/// db.store.apply_outcome(&ids[0], true)?;
/// ```
pub struct TestDatabaseManager {
    /// The store under test
    pub store: ContentStore<SqliteBackend>,
    /// Kept alive so the directory outlives the store
    _temp_dir: Option<TempDir>,
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Create a new store in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_recalla.db");
        let store = ContentStore::open(Some(db_path.clone())).expect("Failed to create test store");

        Self {
            store,
            _temp_dir: Some(temp_dir),
            db_path,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Drop the current connections and open the same file again
    pub fn reopen(self) -> Self {
        let Self {
            store,
            _temp_dir,
            db_path,
        } = self;
        drop(store);
        let store = ContentStore::open(Some(db_path.clone())).expect("Failed to reopen test store");
        Self {
            store,
            _temp_dir,
            db_path,
        }
    }

    pub fn word_count(&self) -> usize {
        self.store.count_words(None).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Create a topic
    pub fn seed_topic(&self, name: &str) -> Topic {
        self.store
            .create_topic(NewTopic::new(name))
            .expect("Failed to create topic")
    }

    /// Add `count` fresh words outside any topic
    pub fn seed_words(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| self.add(NewWord::new(format!("word-{i}"), format!("meaning-{i}"))).id)
            .collect()
    }

    /// Add `count` fresh words to a topic
    pub fn seed_topic_words(&self, topic_id: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let input = NewWord::new(
                    format!("{topic_id}-word-{i}"),
                    format!("{topic_id}-meaning-{i}"),
                );
                self.add(input.in_topic(topic_id)).id
            })
            .collect()
    }

    /// Apply a sequence of outcomes to one word
    pub fn practice(&self, word_id: &str, outcomes: &[bool]) -> WordRecord {
        let mut last = None;
        for &is_correct in outcomes {
            last = Some(
                self.store
                    .apply_outcome(word_id, is_correct)
                    .expect("Failed to apply outcome"),
            );
        }
        last.unwrap_or_else(|| self.word(word_id))
    }

    pub fn word(&self, word_id: &str) -> WordRecord {
        self.store
            .get_word(word_id)
            .expect("Failed to read word")
            .expect("Word not found")
    }

    fn add(&self, input: NewWord) -> WordRecord {
        self.store.add_word(input).expect("Failed to add word")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_database_creation() {
        let db = TestDatabaseManager::new_temp();
        assert!(db.is_empty());
        assert!(db.path().exists());
    }

    #[test]
    fn test_seed_words() {
        let db = TestDatabaseManager::new_temp();
        let ids = db.seed_words(10);
        assert_eq!(ids.len(), 10);
        assert_eq!(db.word_count(), 10);
    }

    #[test]
    fn test_reopen_keeps_progress() {
        let db = TestDatabaseManager::new_temp();
        let topic = db.seed_topic("Animals");
        let ids = db.seed_topic_words(&topic.id, 3);
        db.practice(&ids[0], &[true, true, false]);

        let db = db.reopen();
        let word = db.word(&ids[0]);
        assert_eq!(word.correct, 2);
        assert_eq!(word.wrong, 1);
        assert_eq!(word.consecutive_correct, 0);
        assert_eq!(db.store.count_words(Some(&topic.id)).unwrap(), 3);
    }
}
