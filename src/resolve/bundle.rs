//! Bundle aliasing: folding several installed components into one logical app

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::DEFAULT_BUNDLE_ALIASES;
use crate::manifest::types::Catalog;

/// Mapping from installed component display name to logical app name.
///
/// A name without an entry is its own app name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Return the logical app name for a component, or the name itself
    pub fn resolve<'a>(&'a self, component_name: &'a str) -> &'a str {
        self.aliases
            .get(component_name)
            .map(String::as_str)
            .unwrap_or(component_name)
    }

    /// Build a table from the bundle memberships declared in a catalog.
    ///
    /// Apps are visited in name order and versions in key order. When two apps
    /// claim the same component, the first claim is kept.
    pub fn rebuild(catalog: &Catalog) -> Self {
        let mut aliases: BTreeMap<String, String> = BTreeMap::new();

        for (app_name, app) in &catalog.apps {
            for version in app.versions.values() {
                for member in &version.bundle {
                    match aliases.get(member) {
                        Some(owner) if owner != app_name => warn!(
                            "Bundle member {} claimed by both {} and {}, keeping {}",
                            member, owner, app_name, owner
                        ),
                        Some(_) => {}
                        None => {
                            aliases.insert(member.clone(), app_name.clone());
                        }
                    }
                }
            }
        }

        debug!("Rebuilt alias table with {} entries", aliases.len());
        Self { aliases }
    }

    pub fn get(&self, component_name: &str) -> Option<&str> {
        self.aliases.get(component_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for AliasTable {
    /// The built-in aliases used until the first catalog arrives
    fn default() -> Self {
        DEFAULT_BUNDLE_ALIASES
            .iter()
            .map(|(member, app)| (member.to_string(), app.to_string()))
            .collect()
    }
}

impl FromIterator<(String, String)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
