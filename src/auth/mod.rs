//! Authentication module entry point.
//!
//! Session records, the session cookie, and background session maintenance.

pub mod cleanup_service;
pub mod session;

pub use cleanup_service::SessionCleanupService;
pub use session::{removal_cookie, session_cookie, Session, SessionToken, SESSION_COOKIE_NAME};
