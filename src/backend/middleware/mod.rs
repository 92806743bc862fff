//! Middleware Module
//!
//! This module contains all HTTP middleware for the backend server.
//! Middleware functions are used to process requests before they reach
//! handlers.
//!
//! # Architecture
//!
//! The middleware module currently provides:
//!
//! - **`auth`** - Principal resolution from bearer tokens and session cookies
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use masagena::backend::middleware::resolve_principal;
//!
//! let app = router.layer(from_fn_with_state(app_state.clone(), resolve_principal));
//! ```

pub mod auth;

pub use auth::{resolve_principal, AuthMethod, CurrentUser, Principal};
