//! Mastery Model
//!
//! Heuristic spaced-repetition model for vocabulary practice. Every value here
//! is recomputed from a [`crate::WordRecord`] on demand; only
//! [`record_outcome`] proposes a new record.
//!
//! ## Core Formulas:
//! - Mastery: round((accuracy*60 + streak_bonus*30 + practice_bonus*10) * practice_penalty)
//! - Difficulty: round(clamp(error_rate*70 + recent_failure_boost, 0, 100))
//! - Retention: R = exp(-hours / S), S = 1 + mastery/100 * 47 hours
//! - Interval: base_hours[min(streak, 7)] * (0.5 + mastery/100 * 1.5)
//! - Priority: (1-R)*400 + difficulty/100*300 + (1-mastery/100)*200 + overdue*100

mod estimators;
mod outcome;
mod priority;

pub use estimators::{
    calculate_learning_velocity,
    calculate_next_review_interval,
    // Core functions
    calculate_retention,
    calculate_retention_at,
    estimate_difficulty,
    hours_since_practice_at,
    is_overdue_at,
    // Constants
    MAX_STABILITY_HOURS,
    MIN_STABILITY_HOURS,
    NEVER_PRACTICED_HOURS,
    RECENT_FAILURE_BOOST,
    REVIEW_BASE_HOURS,
    UNKNOWN_DIFFICULTY,
};

pub use outcome::{record_outcome, record_outcome_at, MASTERY_WEIGHTS};

pub use priority::{
    calculate_priority, calculate_priority_at, PriorityBreakdown, DIFFICULTY_WEIGHT,
    MASTERY_GAP_WEIGHT, OVERDUE_BONUS, RETENTION_WEIGHT,
};
