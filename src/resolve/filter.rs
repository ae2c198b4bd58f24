//! Display policy over resolved entries and notification selection

use serde::Serialize;

use crate::resolve::types::UpdateEntry;

/// Token in the manifest `notify` field that suppresses notifications
const NOTIFY_DISABLED: &str = "false";

/// A notification to hand to the notification sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Apply the display policy to resolved entries.
///
/// Beta entries are dropped unless `show_beta`, older entries unless
/// `show_older`. With both flags off only entries that carry an update remain.
pub fn filter_entries(
    entries: Vec<UpdateEntry>,
    show_beta: bool,
    show_older: bool,
) -> Vec<UpdateEntry> {
    let updates_only = !show_beta && !show_older;

    entries
        .into_iter()
        .filter(|entry| show_beta || !entry.beta)
        .filter(|entry| show_older || !entry.is_older_version)
        .filter(|entry| !updates_only || entry.has_update)
        .collect()
}

/// Whether an entry should raise a notification
pub fn should_notify(entry: &UpdateEntry) -> bool {
    entry.has_update && entry.notify != NOTIFY_DISABLED
}

/// Notifications for every entry that warrants one
pub fn notifications(entries: &[UpdateEntry]) -> impl Iterator<Item = Notification> + '_ {
    entries
        .iter()
        .filter(|entry| should_notify(entry))
        .map(|entry| Notification {
            title: entry.name.clone(),
            body: format!("New update {} available", entry.version),
        })
}
