//! Mastery update applied after each resolved match attempt

use chrono::{DateTime, Utc};

use crate::word::WordRecord;

/// Weights of (accuracy, streak bonus, practice bonus); they sum to 100 so the
/// weighted sum can never leave [0, 100]
pub const MASTERY_WEIGHTS: [f64; 3] = [60.0, 30.0, 10.0];

/// Streak length at which the streak bonus saturates
const STREAK_SATURATION: f64 = 5.0;

/// Attempt count at which the practice bonus saturates
const PRACTICE_SATURATION: f64 = 20.0;

/// Attempts before the score is reported at full confidence
const CONFIDENCE_RAMP_ATTEMPTS: f64 = 5.0;

/// Apply one outcome, stamping it with the current time
///
/// See [`record_outcome_at`].
pub fn record_outcome(word: &WordRecord, is_correct: bool) -> WordRecord {
    record_outcome_at(word, is_correct, Utc::now())
}

/// Apply one outcome and return the updated record
///
/// The input is left untouched. The first few attempts are scaled down
/// linearly so an early lucky streak cannot report high mastery.
pub fn record_outcome_at(word: &WordRecord, is_correct: bool, now: DateTime<Utc>) -> WordRecord {
    let consecutive_correct = if is_correct {
        word.consecutive_correct.saturating_add(1)
    } else {
        0
    };

    let total_attempts = word.total_attempts() as f64 + 1.0;
    let correct_count = if is_correct {
        word.correct as f64 + 1.0
    } else {
        word.correct as f64
    };

    let accuracy = correct_count / total_attempts;
    let streak_bonus = (consecutive_correct as f64 / STREAK_SATURATION).min(1.0);
    let practice_bonus = (total_attempts / PRACTICE_SATURATION).min(1.0);
    let practice_penalty = if total_attempts < CONFIDENCE_RAMP_ATTEMPTS {
        total_attempts / CONFIDENCE_RAMP_ATTEMPTS
    } else {
        1.0
    };

    let [accuracy_weight, streak_weight, practice_weight] = MASTERY_WEIGHTS;
    let raw = (accuracy * accuracy_weight
        + streak_bonus * streak_weight
        + practice_bonus * practice_weight)
        * practice_penalty;

    let mut updated = word.clone();
    updated.consecutive_correct = consecutive_correct;
    updated.mastery_score = raw.round().clamp(0.0, 100.0) as u8;
    if is_correct {
        updated.correct = word.correct.saturating_add(1);
    } else {
        updated.wrong = word.wrong.saturating_add(1);
    }
    updated.last_practiced = Some(now);
    updated
}
