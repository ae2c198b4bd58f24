//! Installed software enumeration
//!
//! OS-specific enumeration (Windows registry, dpkg, ...) lives behind the
//! [`SoftwareSource`] trait. [`SoftwareEnumerator`] combines any number of
//! sources and applies caller-supplied predicates to their entries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// One installed software record as reported by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwEntry {
    pub display_name: String,
    pub version: String,
    #[serde(default)]
    pub publisher: String,
}

impl SwEntry {
    pub fn new(display_name: &str, version: &str, publisher: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            version: version.to_string(),
            publisher: publisher.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid software list: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}

/// Trait for a provider of installed software records
#[cfg_attr(test, automock)]
pub trait SoftwareSource: Send + Sync {
    /// Human readable name used in logs
    fn name(&self) -> String;

    /// List the software currently installed according to this source
    fn enumerate(&self) -> Result<Vec<SwEntry>, SourceError>;
}

type EntryFilter = Box<dyn Fn(&SwEntry) -> bool + Send + Sync>;

/// Combines several sources into one installed software list
#[derive(Default)]
pub struct SoftwareEnumerator {
    sources: Vec<Arc<dyn SoftwareSource>>,
    filters: Vec<EntryFilter>,
}

impl SoftwareEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn SoftwareSource>) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_source(&mut self, source: Arc<dyn SoftwareSource>) {
        self.sources.push(source);
    }

    /// Keep only entries accepted by `filter` (all filters must accept)
    pub fn add_filter<F>(&mut self, filter: F)
    where
        F: Fn(&SwEntry) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
    }

    fn accepts(&self, entry: &SwEntry) -> bool {
        self.filters.iter().all(|filter| filter(entry))
    }

    /// Concatenate the filtered entries of all sources, in source order.
    ///
    /// A failing source is logged and skipped.
    pub fn enumerate(&self) -> Vec<SwEntry> {
        let mut all_entries = Vec::new();

        for source in &self.sources {
            match source.enumerate() {
                Ok(entries) => {
                    let before = all_entries.len();
                    all_entries.extend(entries.into_iter().filter(|entry| self.accepts(entry)));
                    debug!(
                        "Source {} contributed {} entries",
                        source.name(),
                        all_entries.len() - before
                    );
                }
                Err(e) => error!("Failed to enumerate software from {}: {}", source.name(), e),
            }
        }

        all_entries
    }
}

/// Predicate accepting entries whose publisher contains `needle`
pub fn publisher_contains(needle: &str) -> impl Fn(&SwEntry) -> bool + Send + Sync + 'static {
    let needle = needle.to_string();
    move |entry: &SwEntry| entry.publisher.contains(&needle)
}

/// A source that reports a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<SwEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<SwEntry>) -> Self {
        Self { entries }
    }
}

impl SoftwareSource for StaticSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    fn enumerate(&self) -> Result<Vec<SwEntry>, SourceError> {
        Ok(self.entries.clone())
    }
}

/// A source reading a JSON array of [`SwEntry`] records from disk.
///
/// The file is re-read on every enumeration so each cycle sees the live state.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl SoftwareSource for JsonFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn enumerate(&self) -> Result<Vec<SwEntry>, SourceError> {
        let content = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&content)?)
    }
}
