//! Difficulty, retention, review-interval and velocity estimators
//!
//! All functions are pure reads of a [`WordRecord`].

use chrono::{DateTime, Utc};

use crate::word::WordRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Difficulty reported before the first attempt
pub const UNKNOWN_DIFFICULTY: u8 = 50;

/// Flat penalty while the word is on a failure streak
pub const RECENT_FAILURE_BOOST: f64 = 30.0;

/// Weight of the error rate in the difficulty estimate
const ERROR_RATE_WEIGHT: f64 = 70.0;

/// Forgetting-curve stability at mastery 0
pub const MIN_STABILITY_HOURS: f64 = 1.0;

/// Forgetting-curve stability at mastery 100
pub const MAX_STABILITY_HOURS: f64 = 48.0;

/// Base review intervals in hours, indexed by min(streak, 7)
pub const REVIEW_BASE_HOURS: [f64; 8] = [0.1, 0.5, 1.0, 3.0, 8.0, 24.0, 48.0, 96.0];

/// Hours-since-practice assumed for never-practiced words; always overdue
pub const NEVER_PRACTICED_HOURS: f64 = 1000.0;

/// Attempts needed before velocity is reported
const MIN_VELOCITY_ATTEMPTS: u32 = 3;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Estimate difficulty in [0, 100]
///
/// Error rate dominates; an active failure streak adds a fixed penalty
/// rather than compounding.
pub fn estimate_difficulty(word: &WordRecord) -> u8 {
    let total = word.total_attempts();
    if total == 0 {
        return UNKNOWN_DIFFICULTY;
    }

    let error_rate = word.wrong as f64 / total as f64;
    let recent_failure_boost = if word.consecutive_correct == 0 && word.wrong > 0 {
        RECENT_FAILURE_BOOST
    } else {
        0.0
    };

    (error_rate * ERROR_RATE_WEIGHT + recent_failure_boost)
        .clamp(0.0, 100.0)
        .round() as u8
}

// ============================================================================
// RETENTION (forgetting curve)
// ============================================================================

/// Hours elapsed since the last practice, `None` if never practiced
///
/// A last-practiced time in the future (clock skew) counts as zero hours.
pub fn hours_since_practice_at(word: &WordRecord, now: DateTime<Utc>) -> Option<f64> {
    word.last_practiced.map(|last| {
        let elapsed_ms = (now - last).num_milliseconds().max(0);
        elapsed_ms as f64 / MILLIS_PER_HOUR
    })
}

/// Forgetting-curve stability in hours for a mastery score
#[inline]
fn stability_hours(mastery_score: u8) -> f64 {
    MIN_STABILITY_HOURS
        + (mastery_score as f64 / 100.0) * (MAX_STABILITY_HOURS - MIN_STABILITY_HOURS)
}

/// Current recall likelihood in [0, 1]
pub fn calculate_retention(word: &WordRecord) -> f64 {
    calculate_retention_at(word, Utc::now())
}

/// Recall likelihood in [0, 1] at `now`
///
/// Never-practiced words report 0 so they are always treated as due.
pub fn calculate_retention_at(word: &WordRecord, now: DateTime<Utc>) -> f64 {
    match hours_since_practice_at(word, now) {
        None => 0.0,
        Some(hours) => {
            let stability = stability_hours(word.mastery_score);
            (-hours / stability).exp().clamp(0.0, 1.0)
        }
    }
}

// ============================================================================
// REVIEW INTERVAL
// ============================================================================

/// Hours after which the word counts as overdue
///
/// Used only to bias priority; nothing is ever withheld from selection.
pub fn calculate_next_review_interval(word: &WordRecord) -> f64 {
    let index = (word.consecutive_correct as usize).min(REVIEW_BASE_HOURS.len() - 1);
    let base_interval = REVIEW_BASE_HOURS[index];
    let mastery_factor = 0.5 + (word.mastery_score as f64 / 100.0) * 1.5;
    base_interval * mastery_factor
}

/// Whether more time has passed than the review interval allows
pub fn is_overdue_at(word: &WordRecord, now: DateTime<Utc>) -> bool {
    let hours = hours_since_practice_at(word, now).unwrap_or(NEVER_PRACTICED_HOURS);
    hours > calculate_next_review_interval(word)
}

// ============================================================================
// LEARNING VELOCITY
// ============================================================================

/// Diagnostic learning momentum in [-100, 100]
///
/// Not used by selection. Returns 0 until there are enough attempts to say
/// anything.
pub fn calculate_learning_velocity(word: &WordRecord) -> i32 {
    if word.total_attempts() < MIN_VELOCITY_ATTEMPTS {
        return 0;
    }

    let streak = word.consecutive_correct.min(i32::MAX as u32 / 20) as i32;
    let mut velocity = streak * 20 + (word.mastery_score as i32 - 50);
    if word.wrong > word.correct {
        velocity -= 30;
    }
    velocity.clamp(-100, 100)
}

// ============================================================================
// TESTS
// ============================================================================
