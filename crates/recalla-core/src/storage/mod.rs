//! Storage Module
//!
//! Persistence for topics, words and their learning statistics:
//! - `StorageBackend` trait with SQLite and in-memory implementations
//! - Versioned schema migrations
//! - `ContentStore`, the write path that applies match outcomes atomically

mod backend;
mod migrations;
mod sqlite;
mod store;

pub use backend::{MemoryBackend, Result, StorageBackend, StorageError};
pub use migrations::{Migration, MIGRATIONS};
pub use sqlite::SqliteBackend;
pub use store::ContentStore;
