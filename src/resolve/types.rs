//! Types produced by update resolution

use serde::Serialize;

/// An installed application, normalized to its logical app name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledComponent {
    /// Logical app name (after bundle aliasing)
    pub name: String,
    /// Installed version string
    pub version: String,
    pub publisher: String,
    /// Highest version of the app known from the catalog (empty when unknown)
    pub latest_version: String,
}

/// One resolved row: an app at a specific catalog version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateEntry {
    pub name: String,
    pub version: String,
    pub release_note_url: String,
    pub release_date: String,
    pub license: String,
    pub url: String,
    pub md5: String,
    pub sha1: String,
    pub beta: bool,
    pub notify: String,
    /// False for the newest catalog version of the app, true for every older one
    pub is_older_version: bool,
    /// Only ever set on the newest version; older entries are informational
    pub has_update: bool,
    /// Change log rendered as a "Changes:" header followed by dashed lines
    pub changes: String,
}
