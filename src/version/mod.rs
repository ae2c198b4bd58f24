//! Version layer
//!
//! - [`identifier`]: dotted version numbers with an optional pre-release suffix
//! - [`error`]: error types for fetching and caching manifests

pub mod error;
pub mod identifier;

pub use identifier::VersionIdentifier;
