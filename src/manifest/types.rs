//! Catalog types decoded from the release manifest

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata of one published version of an app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppVersion {
    #[serde(deserialize_with = "lenient::string")]
    pub version: String,
    #[serde(deserialize_with = "lenient::string")]
    pub release_note_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub release_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub license: String,
    /// Download URL of the installer
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub md5: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sha1: String,
    #[serde(deserialize_with = "lenient::string")]
    pub beta: String,
    /// `"false"` suppresses notifications for this version
    #[serde(deserialize_with = "lenient::string")]
    pub notify: String,
    /// Installed component names that are folded into this app
    #[serde(deserialize_with = "lenient::string_list")]
    pub bundle: Vec<String>,
    /// Human readable change log lines
    #[serde(deserialize_with = "lenient::string_list")]
    pub changes: Vec<String>,
}

impl AppVersion {
    /// Whether the version is flagged as beta (`"1"` or `"true"`)
    pub fn is_beta(&self) -> bool {
        let beta = self.beta.trim();
        beta == "1" || beta.eq_ignore_ascii_case("true")
    }
}

/// An app and all of its published versions, keyed by version string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct App {
    pub name: String,
    pub versions: BTreeMap<String, AppVersion>,
}

impl App {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            versions: BTreeMap::new(),
        }
    }

    pub fn with_version(mut self, key: &str, version: AppVersion) -> Self {
        self.versions.insert(key.to_string(), version);
        self
    }
}

/// The full release catalog, keyed by app name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub apps: BTreeMap<String, App>,
}

impl Catalog {
    pub fn insert(&mut self, app: App) {
        self.apps.insert(app.name.clone(), app);
    }

    pub fn with_app(mut self, app: App) -> Self {
        self.insert(app);
        self
    }

    pub fn get(&self, name: &str) -> Option<&App> {
        self.apps.get(name)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Find the app and version published under the given download URL.
    ///
    /// A downloader uses this to look up the expected md5/sha1 of a file.
    pub fn version_for_url(&self, url: &str) -> Option<(&App, &AppVersion)> {
        self.apps.values().find_map(|app| {
            app.versions
                .values()
                .find(|version| !version.url.is_empty() && version.url == url)
                .map(|version| (app, version))
        })
    }
}

/// Deserializers that never fail on unexpected value types
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
            Value::String(s) => vec![s],
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("0", false)]
    #[case("", false)]
    #[case("false", false)]
    fn is_beta_accepts_one_and_true(#[case] beta: &str, #[case] expected: bool) {
        let version = AppVersion {
            beta: beta.to_string(),
            ..Default::default()
        };
        assert_eq!(version.is_beta(), expected);
    }

    #[test]
    fn app_version_tolerates_missing_and_mistyped_fields() {
        let version: AppVersion = serde_json::from_value(json!({
            "version": 7,
            "beta": true,
            "bundle": "Lonely Driver",
            "changes": ["Fixed crash", 42, null],
            "md5": null,
            "unknown": { "nested": true }
        }))
        .unwrap();

        assert_eq!(
            version,
            AppVersion {
                version: "7".to_string(),
                beta: "true".to_string(),
                bundle: vec!["Lonely Driver".to_string()],
                changes: vec!["Fixed crash".to_string(), "42".to_string()],
                ..Default::default()
            }
        );
    }

    #[test]
    fn version_for_url_finds_matching_download() {
        let catalog = Catalog::default()
            .with_app(App::new("Viewer").with_version(
                "1.0",
                AppVersion {
                    url: "https://example.com/viewer-1.0.msi".to_string(),
                    md5: "abc".to_string(),
                    ..Default::default()
                },
            ))
            .with_app(App::new("Recorder").with_version("2.0", AppVersion::default()));

        let (app, version) = catalog
            .version_for_url("https://example.com/viewer-1.0.msi")
            .unwrap();
        assert_eq!(app.name, "Viewer");
        assert_eq!(version.md5, "abc");

        assert!(catalog.version_for_url("").is_none());
        assert!(catalog.version_for_url("https://example.com/other").is_none());
    }
}
