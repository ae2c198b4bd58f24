//! Manifest parser trait definition

use crate::manifest::types::Catalog;

/// Trait for decoding a published release catalog
pub trait ManifestParser: Send + Sync {
    /// Decode raw manifest bytes into a catalog.
    ///
    /// Only a document that cannot be decoded at all is an error; missing or
    /// malformed per-version fields fall back to defaults.
    fn parse(&self, bytes: &[u8]) -> Result<Catalog, ParseError>;
}

/// Error type for manifest decoding
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The bytes are not a valid document
    #[error("Invalid manifest document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// The document is valid but its top level is not a keyed object
    #[error("Manifest top level must be an object, found {0}")]
    NotAnObject(&'static str),
}
