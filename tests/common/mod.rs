//! Shared test utilities
//!
//! - An axum server standing in for Okapi
//! - Rollover log fixtures
