//! Backend Error Module
//!
//! This module defines the error kinds produced by HTTP handlers and how they
//! are rendered into responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error kinds and status mapping
//! └── conversion.rs - IntoResponse and ErrorPolicy rendering
//! ```
//!
//! # Rendering
//!
//! `BackendError` implements `IntoResponse` with the strict mapping. Handlers
//! go through `ErrorPolicy::render` instead, so the configured policy decides
//! whether an error keeps its own status or collapses into the endpoint's
//! catch-all status.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, ErrorKind};
