//! Domain layer
//!
//! Plain domain types with no HTTP or storage dependencies.

pub mod id;

pub use id::UserId;
