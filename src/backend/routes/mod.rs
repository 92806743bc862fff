//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, middleware and fallback
//! - **`api_routes`** - API endpoints (auth, notifications)
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint handlers
//! ```
//!
//! # Route Types
//!
//! ## Authentication
//!
//! - `POST /api/v1/login` - User login
//! - `POST /api/v1/logout` - User logout
//! - `GET /api/v1/me` - Get current user
//!
//! ## Notifications (administrators)
//!
//! - `GET /api/v1/notifications` - List the inbox
//! - `POST /api/v1/notifications/{id}/mark-as-read` - Mark one read
//! - `POST /api/v1/notifications/mark-all-read` - Mark all read
//!
//! Unknown routes answer 404 `{"message": "Not Found"}`.

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
