//! Word module - vocabulary records, topics and identifiers
//!
//! - [`WordRecord`]: per-word statistics read by the selection engine
//! - [`Topic`]: grouping of words
//! - [`IdGenerator`]: injected ID source for newly created records

mod id;
mod record;

pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use record::{NewTopic, NewWord, Topic, WordRecord};
