//! Collaborators around the resolution engine
//!
//! - [`enumerator`]: installed software sources and the combining enumerator
//! - [`fetcher`]: manifest fetchers (HTTP and local file)
//! - [`cache`]: SQLite store of the last good manifest
//! - [`notify`]: notification sinks

pub mod cache;
pub mod enumerator;
pub mod fetcher;
pub mod notify;

pub use cache::ManifestCache;
pub use enumerator::{JsonFileSource, SoftwareEnumerator, SoftwareSource, SourceError, StaticSource, SwEntry};
pub use fetcher::{FileManifestFetcher, HttpManifestFetcher, ManifestFetcher};
pub use notify::{ChannelNotificationSink, LogNotificationSink, NotificationSink};
