//! JSON release manifest parser
//!
//! Expected shape:
//!
//! ```text
//! { "<AppName>": { "<VersionString>": { "version": "...", "url": "...", "bundle": [...], ... } } }
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use crate::manifest::traits::{ManifestParser, ParseError};
use crate::manifest::types::{App, AppVersion, Catalog};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestParser;

impl JsonManifestParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_version_record(app_name: &str, key: &str, record: Value) -> AppVersion {
        match record {
            Value::Object(_) => serde_json::from_value(record).unwrap_or_else(|e| {
                warn!("Invalid version record {} {}: {}", app_name, key, e);
                AppVersion::default()
            }),
            other => {
                warn!(
                    "Version record {} {} is {}, using defaults",
                    app_name,
                    key,
                    value_kind(&other)
                );
                AppVersion::default()
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ManifestParser for JsonManifestParser {
    fn parse(&self, bytes: &[u8]) -> Result<Catalog, ParseError> {
        let document: Value = serde_json::from_slice(bytes)?;

        let apps = match document {
            Value::Object(apps) => apps,
            other => return Err(ParseError::NotAnObject(value_kind(&other))),
        };

        let mut catalog = Catalog::default();

        for (name, app_value) in apps {
            let mut app = App::new(&name);

            match app_value {
                Value::Object(versions) => {
                    for (key, record) in versions {
                        let version = Self::parse_version_record(&name, &key, record);
                        app.versions.insert(key, version);
                    }
                }
                other => warn!(
                    "App {} has no version map ({}), treating it as empty",
                    name,
                    value_kind(&other)
                ),
            }

            catalog.insert(app);
        }

        debug!("Parsed manifest with {} apps", catalog.len());
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "Data Recorder": {
            "7.1.0": {
                "version": "7.1.0",
                "release_note_url": "https://example.com/notes/7.1.0",
                "release_date": "2024-03-01",
                "license": "commercial",
                "url": "https://example.com/recorder-7.1.0.exe",
                "md5": "d41d8cd98f00b204e9800998ecf8427e",
                "sha1": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
                "beta": "0",
                "notify": "true",
                "bundle": ["Recorder Driver", "Recorder Explorer"],
                "changes": ["Faster export", "New plugin API"]
            },
            "7.2.0 RC1": {
                "version": "7.2.0 RC1",
                "beta": "1"
            }
        },
        "Calibration Tool": {
            "1.0": { "version": "1.0", "extra": { "ignored": true } }
        }
    }"#;

    #[test]
    fn parse_decodes_apps_versions_and_metadata() {
        let catalog = JsonManifestParser::new().parse(MANIFEST.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);

        let recorder = catalog.get("Data Recorder").unwrap();
        assert_eq!(recorder.name, "Data Recorder");
        assert_eq!(
            recorder.versions.keys().collect::<Vec<_>>(),
            vec!["7.1.0", "7.2.0 RC1"]
        );

        let release = &recorder.versions["7.1.0"];
        assert_eq!(release.release_date, "2024-03-01");
        assert_eq!(release.url, "https://example.com/recorder-7.1.0.exe");
        assert_eq!(release.bundle, vec!["Recorder Driver", "Recorder Explorer"]);
        assert_eq!(release.changes, vec!["Faster export", "New plugin API"]);
        assert!(!release.is_beta());

        let candidate = &recorder.versions["7.2.0 RC1"];
        assert!(candidate.is_beta());
        assert!(candidate.release_note_url.is_empty());
        assert!(candidate.bundle.is_empty());
        assert!(candidate.changes.is_empty());
    }

    #[test]
    fn parse_tolerates_non_object_apps_and_records() {
        let catalog = JsonManifestParser::new()
            .parse(br#"{ "Broken": "not a map", "Odd": { "1.0": "not a record", "2.0": [1, 2] } }"#)
            .unwrap();

        assert!(catalog.get("Broken").unwrap().versions.is_empty());

        let odd = catalog.get("Odd").unwrap();
        assert_eq!(odd.versions["1.0"], AppVersion::default());
        assert_eq!(odd.versions["2.0"], AppVersion::default());
    }

    #[test]
    fn parse_accepts_empty_object() {
        let catalog = JsonManifestParser::new().parse(b"{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn parse_rejects_undecodable_input() {
        let result = JsonManifestParser::new().parse(b"<html>503</html>");
        assert!(matches!(result, Err(ParseError::InvalidDocument(_))));
    }

    #[test]
    fn parse_rejects_non_object_top_level() {
        let result = JsonManifestParser::new().parse(b"[1, 2, 3]");
        assert!(matches!(result, Err(ParseError::NotAnObject("an array"))));
    }
}
