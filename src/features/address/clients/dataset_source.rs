use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::address::dataset::DatasetTable;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the raw JSON for each reference table comes from
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Short description used in logs
    fn describe(&self) -> String;

    async fn fetch(&self, table: DatasetTable) -> Result<Vec<u8>, DatasetError>;
}

/// Fetches the tables as static files served over HTTP
pub struct HttpDatasetSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDatasetSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DatasetError> {
        let client = reqwest::Client::builder()
            .user_agent("PrapaCore/1.0 (address-dataset)")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, table: DatasetTable) -> String {
        format!("{}/{}", self.base_url, table.file_name())
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch(&self, table: DatasetTable) -> Result<Vec<u8>, DatasetError> {
        let url = self.url_for(table);
        tracing::debug!("Fetching {} from {}", table, url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DatasetError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Reads the tables from a local directory
pub struct FileDatasetSource {
    dir: PathBuf,
}

impl FileDatasetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn fetch(&self, table: DatasetTable) -> Result<Vec<u8>, DatasetError> {
        let path = self.dir.join(table.file_name());
        tracing::debug!("Reading {} from {}", table, path.display());

        tokio::fs::read(&path).await.map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
