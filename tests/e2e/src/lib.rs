//! End-to-end test support for Recalla
//!
//! - `harness`: isolated on-disk stores
//! - `mocks`: word fixtures and pre-built practice histories

pub mod harness;
pub mod mocks;
