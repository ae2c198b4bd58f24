//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use app_update::manifest::{Catalog, JsonManifestParser, ManifestParser};
use app_update::resolve::Notification;
use app_update::source::{NotificationSink, SoftwareEnumerator, StaticSource, SwEntry};

/// Sink that keeps every notification it receives
#[derive(Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) {
        self.received.lock().unwrap().push(notification.clone());
    }
}

pub fn demo_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(file_name)
}

pub fn demo_manifest() -> Vec<u8> {
    std::fs::read(demo_path("update.json")).unwrap()
}

pub fn demo_catalog() -> Catalog {
    JsonManifestParser::new().parse(&demo_manifest()).unwrap()
}

pub fn sw(display_name: &str, version: &str) -> SwEntry {
    SwEntry::new(display_name, version, "DEWETRON GmbH")
}

pub fn enumerator_with(entries: Vec<SwEntry>) -> SoftwareEnumerator {
    SoftwareEnumerator::new().with_source(Arc::new(StaticSource::new(entries)))
}
