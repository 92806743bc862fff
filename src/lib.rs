//! Masagena - Main Library
//!
//! Masagena is the API backend behind the Masagena admin panel. This crate
//! provides its authentication endpoints (login, logout, current user) and the
//! administrator notification inbox.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Types that do not depend on the HTTP stack
//!   - Configuration loading (`AppConfig`)
//!   - Input validation helpers
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and route configuration
//!   - Authentication: users, bearer tokens, sessions, authorization policy
//!   - Notification inbox handlers
//!   - Postgres and in-memory stores
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use masagena::backend::server::init::create_app;
//! use masagena::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(config).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `ValidationErrors` and `ConfigError` in `shared`
//! - `BackendError` and `StoreError` in `backend`, rendered to HTTP responses
//!   according to the configured `ErrorPolicy`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
