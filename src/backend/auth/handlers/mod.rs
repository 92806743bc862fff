//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//! Handlers are organized into focused submodules for maintainability.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── login.rs    - User authentication handler
//! ├── logout.rs   - Token revocation and session teardown
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`login`** - POST /api/v1/login - Issue a bearer token and start a session
//! - **`logout`** - POST /api/v1/logout - Revoke tokens and drop the session
//! - **`view`** - GET /api/v1/me - Get current user info
//!
//! Every handler renders its errors through the configured `ErrorPolicy`.

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Get current user handler
pub mod me;

// Re-export commonly used types
pub use types::{LoginRequest, LoginResponse, MessageResponse, UserResponse};

// Re-export handlers
pub use login::login;
pub use logout::logout;
pub use me::view;
