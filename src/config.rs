use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default refresh interval in milliseconds (24 hours)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

/// Delay before re-checking after the user acted on an update (1 minute)
pub const RECHECK_DELAY_MS: u64 = 60 * 1000;

/// Timeout for manifest fetches in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Manifest defaults
// =============================================================================

/// Default location of the published release manifest
pub const DEFAULT_MANIFEST_URL: &str = "https://ccc.dewetron.com/dl/update.json";

/// Local manifest candidates tried when neither the server nor the cache answer
pub const DEFAULT_FALLBACK_PATHS: &[&str] = &["demos/update.json", "../demos/update.json"];

/// Components shown as one app before the first manifest provides bundle data
pub const DEFAULT_BUNDLE_ALIASES: &[(&str, &str)] = &[
    ("DEWETRON TRION Driver", "DEWETRON TRION Applications"),
    ("DEWETRON DEWE2 Driver", "DEWETRON TRION Applications"),
    ("DEWETRON Explorer", "DEWETRON TRION Applications"),
    ("DEWETRON TRIONCAL", "DEWETRON TRION Applications"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub manifest: ManifestConfig,
    pub display: DisplayConfig,
    /// Periodic refresh interval in milliseconds
    pub refresh_interval: u64,
    /// Only installed software whose publisher contains this text is considered
    pub publisher_filter: Option<String>,
    /// Aliases used until the first manifest arrives; built-in defaults when absent
    pub bundle_aliases: Option<BTreeMap<String, String>>,
    /// JSON file listing installed software
    pub installed_file: Option<PathBuf>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            manifest: ManifestConfig::default(),
            display: DisplayConfig::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
            publisher_filter: None,
            bundle_aliases: None,
            installed_file: None,
        }
    }
}

/// Manifest location configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestConfig {
    pub url: String,
    pub fallback_paths: Vec<PathBuf>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MANIFEST_URL.to_string(),
            fallback_paths: DEFAULT_FALLBACK_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Display policy configuration
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayConfig {
    pub show_beta_versions: bool,
    pub show_older_versions: bool,
}

impl UpdaterConfig {
    /// Load the configuration file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_slice(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the data directory for app-update.
/// Uses $XDG_DATA_HOME/app-update if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/app-update,
/// or ./app-update if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the manifest cache database.
pub fn db_path() -> PathBuf {
    data_dir().join("manifests.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("app-update.log")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(data_dir)
        .join("app-update")
        .join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("app-update")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn updater_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "display": {
                "showBetaVersions": true
            }
        }))
        .unwrap();

        assert!(result.display.show_beta_versions);
        assert!(!result.display.show_older_versions);
        assert_eq!(result.manifest, ManifestConfig::default());
        assert_eq!(result.refresh_interval, DEFAULT_REFRESH_INTERVAL_MS);
    }

    #[test]
    fn updater_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "manifest": {
                "url": "https://example.com/update.json",
                "fallbackPaths": ["/opt/app/update.json"]
            },
            "display": {
                "showBetaVersions": true,
                "showOlderVersions": true
            },
            "refreshInterval": 5000,
            "publisherFilter": "Acme",
            "bundleAliases": { "Acme Driver": "Acme Suite" },
            "installedFile": "/var/lib/app-update/installed.json"
        }))
        .unwrap();

        assert_eq!(
            result,
            UpdaterConfig {
                manifest: ManifestConfig {
                    url: "https://example.com/update.json".to_string(),
                    fallback_paths: vec![PathBuf::from("/opt/app/update.json")],
                },
                display: DisplayConfig {
                    show_beta_versions: true,
                    show_older_versions: true,
                },
                refresh_interval: 5000,
                publisher_filter: Some("Acme".to_string()),
                bundle_aliases: Some(BTreeMap::from([(
                    "Acme Driver".to_string(),
                    "Acme Suite".to_string()
                )])),
                installed_file: Some(PathBuf::from("/var/lib/app-update/installed.json")),
            }
        );
    }

    #[test]
    fn load_returns_defaults_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = UpdaterConfig::load(&temp_dir.path().join("config.json")).unwrap();

        assert_eq!(result, UpdaterConfig::default());
    }

    #[test]
    fn load_reports_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = UpdaterConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/app-update"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/app-update"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./app-update"));
    }
}
