//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - An in-memory test application served by `axum_test::TestServer`
//! - User, token and notification fixtures
//! - Custom assertion macros

#![allow(dead_code)]

#[macro_use]
pub mod assertions;
pub mod auth_helpers;

// Re-export commonly used utilities
pub use auth_helpers::*;
