//! Server Module
//!
//! This module contains all server-side code for initializing and configuring
//! the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure
//! - **`config`** - Database connection and migrations
//! - **`init`** - Store selection, seeding and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState
//! ├── config.rs       - Database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Store Selection**: PostgreSQL when a database URL is configured and
//!    reachable, otherwise the seeded in-memory store
//! 2. **State Creation**: stores, session store, authorization policy, config
//! 3. **Router Creation**: routes, principal middleware, tracing
//! 4. **Background Tasks**: periodic pruning of expired sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use masagena::backend::server::create_app;
//! use masagena::shared::AppConfig;
//!
//! # async fn example() {
//! let app = create_app(AppConfig::default()).await;
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use state::AppState;
pub use init::{build_state, create_app};
