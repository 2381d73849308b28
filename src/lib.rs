//! # Linkshelf
//!
//! Session lifecycle and link metadata API.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → handlers → SessionStore / MetadataExtractor
//!      ↓                        ↓
//! tracing + metrics        SQLite (sqlx) or in-memory
//! ```
//!
//! Logout always clears the `session` cookie, whether or not the server-side
//! record could be removed.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod storage;

// Re-export commonly used types and traits
pub use config::Config;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
