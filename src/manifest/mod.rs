//! Manifest layer
//! - traits.rs: ManifestParser trait definition
//! - types.rs: Catalog, App, AppVersion
//! - json.rs: JSON manifest parser

pub mod json;
pub mod traits;
pub mod types;

pub use json::JsonManifestParser;
pub use traits::{ManifestParser, ParseError};
pub use types::{App, AppVersion, Catalog};
