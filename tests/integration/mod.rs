//! Integration tests for the rollover replay
//!
//! These run the full pipeline over real HTTP against a mock Okapi.

#[path = "../common/mod.rs"]
pub mod common;

pub mod replay_flow;
