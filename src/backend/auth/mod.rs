//! Authentication Module
//!
//! This module handles user authentication, authorization and session
//! management. It provides HTTP handlers for the authentication endpoints.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`users`** - User model and the `UserStore` collaborator
//! - **`tokens`** - Opaque bearer tokens (issue and verify)
//! - **`sessions`** - In-memory server-side sessions and cookies
//! - **`policy`** - Roles, permissions and the authorization policy
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and store trait
//! ├── tokens.rs       - Personal access tokens
//! ├── sessions.rs     - Session store
//! ├── policy.rs       - Authorization policy
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: email and password verified → session regenerated → bearer token returned
//! 2. **Requests**: bearer token or session cookie → `Principal` attached by middleware
//! 3. **Logout**: all bearer tokens revoked → session invalidated → CSRF token rotated
//!
//! # Security
//!
//! - Passwords are verified against bcrypt hashes
//! - Bearer tokens are stored as SHA-256 hashes and never expire
//! - Unknown email and wrong password are indistinguishable to the client

/// User data model and store trait
pub mod users;

/// Personal access tokens
pub mod tokens;

/// Server-side sessions
pub mod sessions;

/// Roles and permissions
pub mod policy;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{LoginRequest, LoginResponse, UserResponse};
pub use handlers::{login, logout, view};
pub use policy::{AuthorizationPolicy, Permission, Role};
pub use sessions::SessionStore;
pub use users::{User, UserStore};
