//! Manifest fetchers: where the raw manifest bytes come from

use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::version::error::FetchError;

const USER_AGENT: &str = concat!("app-update/", env!("CARGO_PKG_VERSION"));

/// Trait for fetching the raw bytes of a release manifest
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ManifestFetcher: Send + Sync {
    /// URL or path identifying the manifest, used as cache key and in logs
    fn location(&self) -> String;

    /// Fetch the manifest bytes
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Fetches the manifest over HTTP(S)
pub struct HttpManifestFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpManifestFetcher {
    pub fn new(url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(url, Duration::from_millis(FETCH_TIMEOUT_MS))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ManifestFetcher for HttpManifestFetcher {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(self.url.clone()));
        }

        if !status.is_success() {
            warn!("Manifest server returned status {}: {}", status, self.url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);

        Ok(body.to_vec())
    }
}

/// Reads the manifest from the first readable file among candidate paths
#[derive(Debug, Clone)]
pub struct FileManifestFetcher {
    paths: Vec<PathBuf>,
}

impl FileManifestFetcher {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait::async_trait]
impl ManifestFetcher for FileManifestFetcher {
    fn location(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        for path in &self.paths {
            match tokio::fs::read(path).await {
                Ok(content) => {
                    debug!("Read manifest from {:?}", path);
                    return Ok(content);
                }
                Err(e) => debug!("Manifest candidate {:?} not readable: {}", path, e),
            }
        }

        Err(FetchError::NotFound(self.location()))
    }
}
