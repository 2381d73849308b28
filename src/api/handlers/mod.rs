pub mod auth;
pub mod health;
pub mod urls;

pub use auth::{logout_handler, LogoutOutcome, LogoutResponse};
pub use health::{health_handler, HealthResponse};
pub use urls::{extract_metadata_handler, ExtractMetadataBody};
