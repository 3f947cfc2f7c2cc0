//! Object-storage HTTP client for re-hosted message media.
//!
//! Speaks a Supabase-storage-compatible API: authenticated uploads under
//! `/object/{bucket}/{key}`, public reads under `/object/public/{bucket}/{key}`.
//! Uploads default to no-clobber so a key collision can never silently
//! overwrite an earlier asset.

pub mod error;

pub use error::{Result, StoreError};

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Configuration for connecting to the object store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the storage API (e.g. "https://xyz.supabase.co/storage/v1").
    pub base_url: String,
    /// Bucket that receives re-hosted media.
    pub bucket: String,
    /// Service key sent as a bearer token.
    pub service_key: String,
}

impl StoreConfig {
    /// Create a new configuration.
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
            service_key: service_key.into(),
        }
    }

    /// Upload endpoint for a key.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, key)
    }

    /// Public read URL for a key.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, key)
    }
}

/// Client for the object store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Upload timeout. A hanging store must not stall message ingestion.
    const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);

    /// Build a client for the given store.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Self::UPLOAD_TIMEOUT)
            .build()
            .map_err(StoreError::Http)?;

        Ok(Self { http, config })
    }

    /// Upload an object.
    ///
    /// With `no_clobber` set, an existing object under the same key is left
    /// untouched and the call fails with [`StoreError::Conflict`].
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        no_clobber: bool,
    ) -> Result<()> {
        let url = self.config.object_url(key);
        debug!(key, content_type, "Uploading object");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.service_key))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", if no_clobber { "false" } else { "true" })
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }
        if !status.is_success() {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    /// Public URL for an uploaded object.
    pub fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_layout() {
        let config = StoreConfig::new("https://store.example/storage/v1", "media", "key");
        assert_eq!(
            config.object_url("inbound/a.jpg"),
            "https://store.example/storage/v1/object/media/inbound/a.jpg"
        );
        assert_eq!(
            config.public_url("inbound/a.jpg"),
            "https://store.example/storage/v1/object/public/media/inbound/a.jpg"
        );
    }

    #[tokio::test]
    async fn unreachable_store_is_an_error() {
        // Port 9 is discard; nothing listens there in CI.
        let config = StoreConfig::new("http://127.0.0.1:9", "media", "key");
        let client = StoreClient::new(config).unwrap();

        let result = client.upload("k", b"data".to_vec(), "text/plain", true).await;
        assert!(matches!(result, Err(StoreError::Http(_))));
    }
}
