//! Test data generators

mod fixtures;

pub use fixtures::{BatchConfig, TestDataFactory, TestScenario};
