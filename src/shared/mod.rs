//! Shared Module
//!
//! This module contains types that are independent of the HTTP server:
//! configuration and input validation.
//! Nothing here requires the `ssr` feature.

/// Request input validation
pub mod validation;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use validation::{FieldError, ValidationErrors};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ErrorPolicy, SeedConfig};
