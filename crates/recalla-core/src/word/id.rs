//! Identifier generation
//!
//! Record IDs come from an injected [`IdGenerator`] rather than process-wide
//! state, so each content store owns its own sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

/// Source of unique record identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier never returned before by this generator
    fn next_id(&self) -> String;
}

/// Random UUID v4 identifiers (the default)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<millis>-<counter>` identifiers
///
/// The counter is monotonic per generator, so two IDs minted within the same
/// millisecond still differ and sort in creation order.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose counter starts at zero
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:06}", Utc::now().timestamp_millis(), seq)
    }
}
