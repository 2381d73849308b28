//! Repository modules for data access

pub mod memory;
pub mod session;

pub use memory::InMemorySessionStore;
pub use session::{SessionStore, SqlxSessionStore};
