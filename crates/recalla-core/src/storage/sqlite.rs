//! SQLite Storage Backend
//!
//! Durable backend: one reader and one writer connection over the same
//! database file, WAL journaling, and versioned migrations.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use super::backend::{Result, StorageBackend, StorageError};
use crate::word::{Topic, WordRecord};

const WORD_COLUMNS: &str = "id, word, meaning, topic_id, correct, wrong, consecutive_correct, \
                            last_practiced, mastery_score, created_at";

const TOPIC_COLUMNS: &str = "id, name, description, emoji, created_at";

/// SQLite-backed word and topic storage
///
/// All methods take `&self`; the connections sit behind mutexes so the
/// backend is `Send + Sync`.
pub struct SqliteBackend {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteBackend {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }

    /// Default database location under the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "recalla", "core").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("recalla.db"))
    }

    /// Open (or create) the database at `db_path`, or at the default location
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        let applied = super::migrations::apply_migrations(&writer_conn)?;
        if applied > 0 {
            tracing::info!(applied, path = %path.display(), "Database schema updated");
        }

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn writer(&self) -> Result<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    fn reader(&self) -> Result<MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(StorageError::InvalidTimestamp(format!(
                        "{} '{}': {}",
                        field_name, value, e
                    ))),
                )
            })
    }

    /// Convert a row to WordRecord
    fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<WordRecord> {
        let last_practiced: Option<String> = row.get("last_practiced")?;
        let created_at: String = row.get("created_at")?;

        let last_practiced = last_practiced
            .map(|s| Self::parse_timestamp(&s, "last_practiced"))
            .transpose()?;
        let mastery: i64 = row.get("mastery_score")?;

        Ok(WordRecord {
            id: row.get("id")?,
            word: row.get("word")?,
            meaning: row.get("meaning")?,
            topic_id: row.get("topic_id")?,
            correct: row.get("correct")?,
            wrong: row.get("wrong")?,
            consecutive_correct: row.get("consecutive_correct")?,
            last_practiced,
            mastery_score: mastery.clamp(0, 100) as u8,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    /// Convert a row to Topic
    fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
        let created_at: String = row.get("created_at")?;
        Ok(Topic {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            emoji: row.get("emoji")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }
}

impl StorageBackend for SqliteBackend {
    fn insert_topic(&self, topic: &Topic) -> Result<()> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO topics (id, name, description, emoji, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                topic.id,
                topic.name,
                topic.description,
                topic.emoji,
                topic.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        let reader = self.reader()?;
        let mut stmt =
            reader.prepare(&format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ?1"))?;
        let topic = stmt
            .query_row(params![id], |row| Self::row_to_topic(row))
            .optional()?;
        Ok(topic)
    }

    fn list_topics(&self) -> Result<Vec<Topic>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics ORDER BY created_at ASC, rowid ASC"
        ))?;
        let topics = stmt.query_map([], |row| Self::row_to_topic(row))?;

        let mut result = Vec::new();
        for topic in topics {
            result.push(topic?);
        }
        Ok(result)
    }

    fn delete_topic(&self, id: &str) -> Result<bool> {
        let writer = self.writer()?;
        // Words go with it via ON DELETE CASCADE
        let rows = writer.execute("DELETE FROM topics WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn insert_word(&self, word: &WordRecord) -> Result<()> {
        let writer = self.writer()?;
        writer.execute(
            &format!(
                "INSERT INTO words ({WORD_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                word.id,
                word.word,
                word.meaning,
                word.topic_id,
                word.correct,
                word.wrong,
                word.consecutive_correct,
                word.last_practiced.map(|t| t.to_rfc3339()),
                word.mastery_score,
                word.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get_word(&self, id: &str) -> Result<Option<WordRecord>> {
        let reader = self.reader()?;
        let mut stmt =
            reader.prepare(&format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"))?;
        let word = stmt
            .query_row(params![id], |row| Self::row_to_word(row))
            .optional()?;
        Ok(word)
    }

    fn list_words(&self, topic_id: Option<&str>) -> Result<Vec<WordRecord>> {
        let reader = self.reader()?;
        let mut result = Vec::new();

        match topic_id {
            Some(topic_id) => {
                let mut stmt = reader.prepare(&format!(
                    "SELECT {WORD_COLUMNS} FROM words
                     WHERE topic_id = ?1
                     ORDER BY created_at ASC, rowid ASC"
                ))?;
                let words = stmt.query_map(params![topic_id], |row| Self::row_to_word(row))?;
                for word in words {
                    result.push(word?);
                }
            }
            None => {
                let mut stmt = reader.prepare(&format!(
                    "SELECT {WORD_COLUMNS} FROM words ORDER BY created_at ASC, rowid ASC"
                ))?;
                let words = stmt.query_map([], |row| Self::row_to_word(row))?;
                for word in words {
                    result.push(word?);
                }
            }
        }

        Ok(result)
    }

    fn update_word(&self, word: &WordRecord) -> Result<bool> {
        let writer = self.writer()?;
        let rows = writer.execute(
            "UPDATE words SET
                word = ?1,
                meaning = ?2,
                topic_id = ?3,
                correct = ?4,
                wrong = ?5,
                consecutive_correct = ?6,
                last_practiced = ?7,
                mastery_score = ?8
            WHERE id = ?9",
            params![
                word.word,
                word.meaning,
                word.topic_id,
                word.correct,
                word.wrong,
                word.consecutive_correct,
                word.last_practiced.map(|t| t.to_rfc3339()),
                word.mastery_score,
                word.id,
            ],
        )?;
        Ok(rows > 0)
    }

    fn update_word_text(&self, id: &str, word: &str, meaning: &str) -> Result<bool> {
        let writer = self.writer()?;
        let rows = writer.execute(
            "UPDATE words SET word = ?1, meaning = ?2 WHERE id = ?3",
            params![word, meaning, id],
        )?;
        Ok(rows > 0)
    }

    fn delete_word(&self, id: &str) -> Result<bool> {
        let writer = self.writer()?;
        let rows = writer.execute("DELETE FROM words WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn count_words(&self, topic_id: Option<&str>) -> Result<usize> {
        let reader = self.reader()?;
        let count: i64 = match topic_id {
            Some(topic_id) => reader.query_row(
                "SELECT COUNT(*) FROM words WHERE topic_id = ?1",
                params![topic_id],
                |row| row.get(0),
            )?,
            None => reader.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?,
        };
        Ok(count as usize)
    }
}

// ============================================================================
// TESTS
// ============================================================================
