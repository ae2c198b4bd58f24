//! One refresh cycle: manifest, installed software, resolution, notifications

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::DisplayConfig;
use crate::manifest::json::JsonManifestParser;
use crate::manifest::traits::ManifestParser;
use crate::resolve::bundle::AliasTable;
use crate::resolve::filter::{filter_entries, notifications};
use crate::resolve::types::{InstalledComponent, UpdateEntry};
use crate::source::cache::ManifestCache;
use crate::source::enumerator::SoftwareEnumerator;
use crate::source::fetcher::ManifestFetcher;
use crate::source::notify::NotificationSink;

use super::state::UpdaterState;

/// Where the manifest applied in a cycle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestOrigin {
    Primary,
    Cache,
    Fallback,
}

/// Result of one refresh cycle
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    /// Entries left after applying the display policy
    pub entries: Vec<UpdateEntry>,
    pub installed: Vec<InstalledComponent>,
    /// None when no manifest could be loaded and the previous catalog was kept
    pub manifest_origin: Option<ManifestOrigin>,
    pub notified: usize,
    pub checked_at: DateTime<Utc>,
}

impl UpdateReport {
    pub fn manifest_updated(&self) -> bool {
        self.manifest_origin.is_some()
    }

    pub fn update_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_update).count()
    }
}

/// Runs refresh cycles against a set of collaborators.
///
/// Manifest lookup order: primary fetcher, cached copy of the primary
/// location, then the fallback fetcher.
pub struct Updater {
    state: UpdaterState,
    parser: Arc<dyn ManifestParser>,
    primary: Arc<dyn ManifestFetcher>,
    fallback: Option<Arc<dyn ManifestFetcher>>,
    cache: Option<Arc<ManifestCache>>,
    enumerator: SoftwareEnumerator,
    sink: Arc<dyn NotificationSink>,
    display: DisplayConfig,
}

impl Updater {
    pub fn new(
        primary: Arc<dyn ManifestFetcher>,
        enumerator: SoftwareEnumerator,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state: UpdaterState::default(),
            parser: Arc::new(JsonManifestParser::new()),
            primary,
            fallback: None,
            cache: None,
            enumerator,
            sink,
            display: DisplayConfig::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ManifestFetcher>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_cache(mut self, cache: Arc<ManifestCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Seed aliases used until the first manifest is applied
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.state = UpdaterState::new(aliases);
        self
    }

    pub fn state(&self) -> &UpdaterState {
        &self.state
    }

    /// Change the display policy; takes effect on the next [`Updater::entries`] call
    pub fn set_display(&mut self, display: DisplayConfig) {
        self.display = display;
    }

    /// Current entries under the display policy, without fetching anything
    pub fn entries(&self) -> Vec<UpdateEntry> {
        filter_entries(
            self.state.resolve(),
            self.display.show_beta_versions,
            self.display.show_older_versions,
        )
    }

    /// Run a full cycle and notify the sink about entries that warrant it
    pub async fn refresh_cycle(&mut self) -> UpdateReport {
        let manifest_origin = self.update_manifest().await;

        let sw_entries = self.enumerator.enumerate();
        let installed = self.state.refresh_installed(&sw_entries).to_vec();
        debug!(
            "{} installed components from {} raw entries",
            installed.len(),
            sw_entries.len()
        );

        let entries = self.entries();

        let mut notified = 0;
        for notification in notifications(&entries) {
            self.sink.notify(&notification);
            notified += 1;
        }

        let report = UpdateReport {
            entries,
            installed,
            manifest_origin,
            notified,
            checked_at: Utc::now(),
        };

        info!(
            "Refresh finished: {} entries shown, {} updates, {} notifications",
            report.entries.len(),
            report.update_count(),
            report.notified
        );

        report
    }

    async fn update_manifest(&mut self) -> Option<ManifestOrigin> {
        let primary = Arc::clone(&self.primary);
        let location = primary.location();

        match primary.fetch().await {
            Ok(bytes) => {
                if self.apply_manifest(&bytes, &location) {
                    self.store_in_cache(&location, &bytes);
                    return Some(ManifestOrigin::Primary);
                }
            }
            Err(e) => warn!("Failed to fetch manifest from {}: {}", location, e),
        }

        if let Some(cache) = self.cache.clone() {
            match cache.load(&location) {
                Ok(Some(cached)) => {
                    let origin = format!("cache ({} fetched {})", location, cached.fetched_at);
                    if self.apply_manifest(&cached.body, &origin) {
                        return Some(ManifestOrigin::Cache);
                    }
                }
                Ok(None) => debug!("No cached manifest for {}", location),
                Err(e) => error!("Failed to read cached manifest for {}: {}", location, e),
            }
        }

        if let Some(fallback) = self.fallback.clone() {
            let fallback_location = fallback.location();
            match fallback.fetch().await {
                Ok(bytes) => {
                    if self.apply_manifest(&bytes, &fallback_location) {
                        return Some(ManifestOrigin::Fallback);
                    }
                }
                Err(e) => warn!(
                    "Failed to read fallback manifest from {}: {}",
                    fallback_location, e
                ),
            }
        }

        warn!("No manifest available, keeping previous catalog");
        None
    }

    fn apply_manifest(&mut self, bytes: &[u8], origin: &str) -> bool {
        match self.state.apply_manifest(&*self.parser, bytes) {
            Ok(apps) => {
                info!("Loaded manifest from {} with {} apps", origin, apps);
                true
            }
            Err(e) => {
                error!("Failed to parse manifest from {}: {}", origin, e);
                false
            }
        }
    }

    fn store_in_cache(&self, location: &str, bytes: &[u8]) {
        if let Some(cache) = &self.cache {
            let _ = cache
                .store(location, bytes)
                .inspect_err(|e| error!("Failed to cache manifest for {}: {}", location, e));
        }
    }
}
