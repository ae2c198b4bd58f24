//! Update detection: orders catalog versions and compares them to installed software

use tracing::debug;

use crate::manifest::types::{App, AppVersion, Catalog};
use crate::resolve::bundle::AliasTable;
use crate::resolve::types::{InstalledComponent, UpdateEntry};
use crate::source::enumerator::SwEntry;
use crate::version::VersionIdentifier;

/// Highest published version of an app.
///
/// Returns the default identifier when the app is unknown or has no versions.
pub fn highest_version(app_name: &str, catalog: &Catalog) -> VersionIdentifier {
    catalog
        .get(app_name)
        .and_then(|app| app.versions.keys().map(|key| VersionIdentifier::parse(key)).max())
        .unwrap_or_default()
}

/// Pair every version record of an app with its parsed key, highest first
fn ranked_versions(app: &App) -> Vec<(VersionIdentifier, &str, &AppVersion)> {
    let mut ranked: Vec<_> = app
        .versions
        .iter()
        .map(|(key, version)| (VersionIdentifier::parse(key), key.as_str(), version))
        .collect();

    // stable: equal identifiers keep key order
    ranked.sort_by(|(a, _, _), (b, _, _)| b.cmp(a));
    ranked
}

/// All published versions of an app, highest first
pub fn sorted_versions(app_name: &str, catalog: &Catalog) -> Vec<VersionIdentifier> {
    catalog
        .get(app_name)
        .map(|app| {
            ranked_versions(app)
                .into_iter()
                .map(|(identifier, _, _)| identifier)
                .collect()
        })
        .unwrap_or_default()
}

fn update_available(installed: Option<&InstalledComponent>, candidate: &VersionIdentifier) -> bool {
    match installed {
        Some(component) => *candidate > VersionIdentifier::parse(&component.version),
        // not installed yet counts as an available update
        None => true,
    }
}

/// Whether `candidate_version` of `app_name` is newer than what is installed.
///
/// An app that is not installed at all always has an update.
pub fn has_update(
    app_name: &str,
    candidate_version: &str,
    installed: &[InstalledComponent],
) -> bool {
    let component = installed.iter().find(|c| c.name == app_name);
    update_available(component, &VersionIdentifier::parse(candidate_version))
}

/// Build the installed list from raw enumerator entries.
///
/// Names are normalized through the alias table and only the first entry per
/// logical app is kept.
pub fn build_installed(
    entries: &[SwEntry],
    catalog: &Catalog,
    aliases: &AliasTable,
) -> Vec<InstalledComponent> {
    let mut installed: Vec<InstalledComponent> = Vec::new();

    for entry in entries {
        let app_name = aliases.resolve(&entry.display_name);

        if installed.iter().any(|c| c.name == app_name) {
            debug!(
                "Skipping {} {}: {} already listed",
                entry.display_name, entry.version, app_name
            );
            continue;
        }

        installed.push(InstalledComponent {
            name: app_name.to_string(),
            version: entry.version.clone(),
            publisher: entry.publisher.clone(),
            latest_version: highest_version(app_name, catalog).to_string(),
        });
    }

    installed
}

fn render_changes(changes: &[String]) -> String {
    let mut rendered = String::from("Changes:\n");
    for change in changes {
        rendered.push_str("- ");
        rendered.push_str(change);
        rendered.push('\n');
    }
    rendered
}

fn make_entry(
    app_name: &str,
    key: &str,
    version: &AppVersion,
    is_older_version: bool,
    has_update: bool,
) -> UpdateEntry {
    let display_version = if version.version.is_empty() {
        key
    } else {
        version.version.as_str()
    };

    UpdateEntry {
        name: app_name.to_string(),
        version: display_version.to_string(),
        release_note_url: version.release_note_url.clone(),
        release_date: version.release_date.clone(),
        license: version.license.clone(),
        url: version.url.clone(),
        md5: version.md5.clone(),
        sha1: version.sha1.clone(),
        beta: version.is_beta(),
        notify: version.notify.clone(),
        is_older_version,
        has_update,
        changes: render_changes(&version.changes),
    }
}

/// Resolve every catalog app against the installed list.
///
/// For each app with at least one version, the highest version yields the
/// current entry with an update flag; every lower version yields an older entry.
/// Installed components must already carry alias-normalized names, as produced
/// by [`build_installed`]; the alias table is not applied a second time.
pub fn resolve_all(
    installed: &[InstalledComponent],
    catalog: &Catalog,
    aliases: &AliasTable,
) -> Vec<UpdateEntry> {
    let mut entries = Vec::new();

    for (app_name, app) in &catalog.apps {
        let mut ranked = ranked_versions(app).into_iter();

        let Some((highest, key, version)) = ranked.next() else {
            debug!("Skipping {}: no versions published", app_name);
            continue;
        };

        let component = installed.iter().find(|c| c.name == *app_name);
        let has_update = update_available(component, &highest);

        entries.push(make_entry(app_name, key, version, false, has_update));

        entries.extend(
            ranked.map(|(_, key, version)| make_entry(app_name, key, version, true, false)),
        );
    }

    debug!(
        "Resolved {} entries for {} installed components ({} aliases)",
        entries.len(),
        installed.len(),
        aliases.len()
    );
    entries
}
