//! # REST API Components
//!
//! HTTP routing, handlers, error mapping and the server loop.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{build_router, ApiState};
pub use server::{serve, shutdown_signal, start_api_server};
