//! Priority scorer - one scalar per word biasing selection toward review need

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::estimators::{
    calculate_next_review_interval, calculate_retention_at, estimate_difficulty,
    hours_since_practice_at, NEVER_PRACTICED_HOURS,
};
use crate::word::WordRecord;

/// Weight of imminent forgetting (40% of the maximum)
pub const RETENTION_WEIGHT: f64 = 400.0;

/// Weight of difficulty (30%)
pub const DIFFICULTY_WEIGHT: f64 = 300.0;

/// Weight of the raw mastery gap (20%)
pub const MASTERY_GAP_WEIGHT: f64 = 200.0;

/// Flat nudge for overdue words (10%); additive so it cannot dominate
pub const OVERDUE_BONUS: f64 = 100.0;

/// The four terms that make up a priority score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub retention: f64,
    pub difficulty: f64,
    pub mastery_gap: f64,
    pub overdue: f64,
}

impl PriorityBreakdown {
    /// Compute every term for `word` at `now`
    pub fn at(word: &WordRecord, now: DateTime<Utc>) -> Self {
        let retention = calculate_retention_at(word, now);
        let difficulty = estimate_difficulty(word) as f64;
        let hours_since = hours_since_practice_at(word, now).unwrap_or(NEVER_PRACTICED_HOURS);

        Self {
            retention: (1.0 - retention) * RETENTION_WEIGHT,
            difficulty: (difficulty / 100.0) * DIFFICULTY_WEIGHT,
            mastery_gap: (1.0 - word.mastery_score as f64 / 100.0) * MASTERY_GAP_WEIGHT,
            overdue: if hours_since > calculate_next_review_interval(word) {
                OVERDUE_BONUS
            } else {
                0.0
            },
        }
    }

    /// Rounded sum of the terms
    pub fn total(&self) -> u32 {
        (self.retention + self.difficulty + self.mastery_gap + self.overdue)
            .max(0.0)
            .round() as u32
    }
}

/// Priority of `word` right now
pub fn calculate_priority(word: &WordRecord) -> u32 {
    calculate_priority_at(word, Utc::now())
}

/// Priority of `word` at `now`, informally bounded by 1000
pub fn calculate_priority_at(word: &WordRecord, now: DateTime<Utc>) -> u32 {
    PriorityBreakdown::at(word, now).total()
}
