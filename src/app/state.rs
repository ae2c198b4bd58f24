//! State owned by the updater between refresh cycles

use tracing::debug;

use crate::manifest::traits::{ManifestParser, ParseError};
use crate::manifest::types::Catalog;
use crate::resolve::bundle::AliasTable;
use crate::resolve::resolver::{build_installed, resolve_all};
use crate::resolve::types::{InstalledComponent, UpdateEntry};
use crate::source::enumerator::SwEntry;

/// Catalog, alias table and installed list.
///
/// Each part is only ever replaced as a whole, never merged.
#[derive(Debug, Clone)]
pub struct UpdaterState {
    catalog: Catalog,
    aliases: AliasTable,
    installed: Vec<InstalledComponent>,
}

impl UpdaterState {
    /// Start with an empty catalog and the given seed aliases
    pub fn new(aliases: AliasTable) -> Self {
        Self {
            catalog: Catalog::default(),
            aliases,
            installed: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn installed(&self) -> &[InstalledComponent] {
        &self.installed
    }

    /// Parse a manifest and, on success, replace catalog and alias table.
    ///
    /// On failure the previous catalog and alias table stay untouched.
    /// Returns the number of apps in the new catalog.
    pub fn apply_manifest(
        &mut self,
        parser: &dyn ManifestParser,
        bytes: &[u8],
    ) -> Result<usize, ParseError> {
        let catalog = parser.parse(bytes)?;
        let aliases = AliasTable::rebuild(&catalog);

        debug!(
            "Replacing catalog ({} -> {} apps, {} aliases)",
            self.catalog.len(),
            catalog.len(),
            aliases.len()
        );

        self.catalog = catalog;
        self.aliases = aliases;
        Ok(self.catalog.len())
    }

    /// Rebuild the installed list from the live enumerator output
    pub fn refresh_installed(&mut self, entries: &[SwEntry]) -> &[InstalledComponent] {
        self.installed = build_installed(entries, &self.catalog, &self.aliases);
        &self.installed
    }

    /// Resolve the current installed list against the current catalog
    pub fn resolve(&self) -> Vec<UpdateEntry> {
        resolve_all(&self.installed, &self.catalog, &self.aliases)
    }
}

impl Default for UpdaterState {
    fn default() -> Self {
        Self::new(AliasTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::json::JsonManifestParser;

    const MANIFEST: &[u8] = br#"{
        "Suite": {
            "2.0": { "version": "2.0", "bundle": ["Suite Driver"] },
            "1.0": { "version": "1.0" }
        }
    }"#;

    #[test]
    fn apply_manifest_replaces_catalog_and_aliases() {
        let mut state = UpdaterState::default();

        let apps = state
            .apply_manifest(&JsonManifestParser::new(), MANIFEST)
            .unwrap();

        assert_eq!(apps, 1);
        assert!(state.catalog().get("Suite").is_some());
        assert_eq!(state.aliases().get("Suite Driver"), Some("Suite"));
        assert_eq!(state.aliases().len(), 1);
    }

    #[test]
    fn apply_manifest_keeps_previous_state_on_parse_failure() {
        let mut state = UpdaterState::default();
        state
            .apply_manifest(&JsonManifestParser::new(), MANIFEST)
            .unwrap();
        let before = state.clone();

        let result = state.apply_manifest(&JsonManifestParser::new(), b"not json");

        assert!(result.is_err());
        assert_eq!(state.catalog(), before.catalog());
        assert_eq!(state.aliases(), before.aliases());
    }

    #[test]
    fn refresh_installed_replaces_previous_list() {
        let mut state = UpdaterState::default();
        state
            .apply_manifest(&JsonManifestParser::new(), MANIFEST)
            .unwrap();

        state.refresh_installed(&[SwEntry::new("Suite Driver", "1.0", "Acme")]);
        assert_eq!(state.installed().len(), 1);
        assert_eq!(state.installed()[0].name, "Suite");
        assert_eq!(state.installed()[0].latest_version, "2.0");

        state.refresh_installed(&[]);
        assert!(state.installed().is_empty());
    }

    #[test]
    fn resolve_uses_current_state() {
        let mut state = UpdaterState::default();
        state
            .apply_manifest(&JsonManifestParser::new(), MANIFEST)
            .unwrap();
        state.refresh_installed(&[SwEntry::new("Suite Driver", "1.0", "Acme")]);

        let entries = state.resolve();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].has_update);
        assert_eq!(entries[0].version, "2.0");
        assert!(entries[1].is_older_version);
    }
}
