//! Backend Module
//!
//! This module contains all server-side code for the Masagena API. It
//! provides an Axum HTTP server with token and session authentication and
//! the administrator notification inbox.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Users, bearer tokens, sessions, authorization policy, handlers
//! - **`notifications`** - Notification models and inbox handlers
//! - **`store`** - PostgreSQL and in-memory persistence
//! - **`middleware`** - Principal resolution
//! - **`error`** - Backend error kinds and their rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication and authorization
//! ├── notifications/  - Notification inbox
//! ├── store/          - Store implementations
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Error Rendering
//!
//! Handlers return `BackendError` internally and render it through the
//! configured `ErrorPolicy`. `strict` maps each error kind to its own status;
//! `compat` folds everything except the access checks into the endpoint's
//! catch-all status with a `{"msg": ..}` body.

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and authorization
pub mod auth;

/// Notification inbox
pub mod notifications;

/// Persistence backends
pub mod store;

/// Request middleware
pub mod middleware;

/// Backend error types
pub mod error;
