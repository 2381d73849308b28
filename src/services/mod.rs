//! Business logic services
//!
//! Service layer components that encapsulate logic separated from HTTP concerns.

pub mod metadata;

pub use metadata::{HttpMetadataExtractor, MetadataExtractor, UrlMetadata};
