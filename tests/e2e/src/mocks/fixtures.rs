//! Test Data Factory
//!
//! Builds in-memory word records with controlled practice histories:
//! - Fresh, struggling, mastered and stale words
//! - Batch generation for selection statistics
//! - Pre-built mixed pools for journey tests

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use recalla_core::{record_outcome_at, WordRecord};

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let now = Utc::now();
/// let hard = TestDataFactory::struggling_word("w1", now);
/// let pool = TestDataFactory::create_batch(&BatchConfig::default(), now);
/// ```
pub struct TestDataFactory;

/// Configuration for batch generation
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of words to create
    pub count: usize,
    /// Prefix for ids and word text
    pub prefix: String,
    /// Topic assigned to every word
    pub topic_id: Option<String>,
    /// Outcomes replayed on every word, one minute apart
    pub history: Vec<bool>,
    /// How long ago the last outcome happened
    pub last_practiced_ago: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 10,
            prefix: "word".to_string(),
            topic_id: None,
            history: vec![],
            last_practiced_ago: Duration::hours(1),
        }
    }
}

/// A pool with labelled members
#[derive(Debug)]
pub struct TestScenario {
    pub words: Vec<WordRecord>,
    pub description: String,
    /// Label to word id
    pub labels: HashMap<String, String>,
}

impl TestScenario {
    pub fn id_of(&self, label: &str) -> &str {
        self.labels.get(label).map(String::as_str).unwrap_or_default()
    }
}

impl TestDataFactory {
    // ========================================================================
    // SINGLE WORDS
    // ========================================================================

    pub fn fresh_word(id: &str) -> WordRecord {
        WordRecord::new(id, format!("{id}-word"), format!("{id}-meaning"), None)
    }

    /// Replay `history` ending `ago` before `now`, one minute per outcome
    pub fn with_history(
        id: &str,
        history: &[bool],
        now: DateTime<Utc>,
        ago: Duration,
    ) -> WordRecord {
        let end = now - ago;
        let start = end - Duration::minutes(history.len().saturating_sub(1) as i64);
        history
            .iter()
            .enumerate()
            .fold(Self::fresh_word(id), |word, (i, &is_correct)| {
                record_outcome_at(&word, is_correct, start + Duration::minutes(i as i64))
            })
    }

    /// Mostly wrong and missed last time
    pub fn struggling_word(id: &str, now: DateTime<Utc>) -> WordRecord {
        Self::with_history(id, &[false, true, false, false, false], now, Duration::minutes(30))
    }

    /// Long correct streak, practiced a moment ago
    pub fn mastered_word(id: &str, now: DateTime<Utc>) -> WordRecord {
        Self::with_history(id, &[true; 20], now, Duration::seconds(1))
    }

    /// Well learned but untouched for a month
    pub fn stale_word(id: &str, now: DateTime<Utc>) -> WordRecord {
        Self::with_history(id, &[true; 8], now, Duration::days(30))
    }

    // ========================================================================
    // BATCHES AND SCENARIOS
    // ========================================================================

    pub fn create_batch(config: &BatchConfig, now: DateTime<Utc>) -> Vec<WordRecord> {
        (0..config.count)
            .map(|i| {
                let id = format!("{}-{i}", config.prefix);
                let mut word =
                    Self::with_history(&id, &config.history, now, config.last_practiced_ago);
                word.topic_id = config.topic_id.clone();
                word
            })
            .collect()
    }

    /// One word of each practice profile plus fresh filler
    pub fn mixed_pool(now: DateTime<Utc>, filler: usize) -> TestScenario {
        let mut labels = HashMap::new();
        let mut words = vec![
            Self::fresh_word("fresh"),
            Self::struggling_word("struggling", now),
            Self::mastered_word("mastered", now),
            Self::stale_word("stale", now),
        ];
        for word in &words {
            labels.insert(word.id.clone(), word.id.clone());
        }
        words.extend((0..filler).map(|i| Self::fresh_word(&format!("filler-{i}"))));

        TestScenario {
            words,
            description: "fresh, struggling, mastered and stale words".to_string(),
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recalla_core::estimate_difficulty;

    #[test]
    fn test_profiles() {
        let now = Utc::now();
        assert_eq!(TestDataFactory::mastered_word("m", now).mastery_score, 100);
        assert_eq!(estimate_difficulty(&TestDataFactory::struggling_word("s", now)), 86);
        assert!(TestDataFactory::fresh_word("f").last_practiced.is_none());
    }

    #[test]
    fn test_batch() {
        let now = Utc::now();
        let config = BatchConfig {
            count: 5,
            history: vec![true, false],
            topic_id: Some("t".into()),
            ..Default::default()
        };
        let batch = TestDataFactory::create_batch(&config, now);
        assert_eq!(batch.len(), 5);
        assert!(batch.iter().all(|w| w.wrong == 1 && w.topic_id.as_deref() == Some("t")));
    }
}
