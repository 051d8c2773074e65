//! HTTP bandwidth saturation against public speed test endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use crate::error::Result;
use crate::port::SpeedTest;

pub const DEFAULT_DOWNLOAD_URL: &str = "https://speed.cloudflare.com/__down?bytes=100000000";
pub const DEFAULT_UPLOAD_URL: &str = "https://speed.cloudflare.com/__up";
pub const DEFAULT_UPLOAD_BYTES: usize = 25_000_000;

const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

pub struct HttpSpeedTest {
    http: HttpClient,
    download_url: String,
    upload_url: String,
    upload_bytes: usize,
}

impl HttpSpeedTest {
    #[must_use]
    pub fn new(download_url: impl Into<String>, upload_url: impl Into<String>, upload_bytes: usize) -> Self {
        let http = HttpClient::builder()
            .timeout(TRANSFER_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            download_url: download_url.into(),
            upload_url: upload_url.into(),
            upload_bytes,
        }
    }
}

impl Default for HttpSpeedTest {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_URL, DEFAULT_UPLOAD_URL, DEFAULT_UPLOAD_BYTES)
    }
}

#[async_trait]
impl SpeedTest for HttpSpeedTest {
    async fn download(&self) -> Result<()> {
        let mut response = self
            .http
            .get(&self.download_url)
            .send()
            .await?
            .error_for_status()?;

        let mut received = 0usize;
        while let Some(chunk) = response.chunk().await? {
            received += chunk.len();
        }
        debug!(bytes = received, url = %self.download_url, "Download finished");
        Ok(())
    }

    async fn upload(&self) -> Result<()> {
        self.http
            .post(&self.upload_url)
            .body(vec![0u8; self.upload_bytes])
            .send()
            .await?
            .error_for_status()?;
        debug!(bytes = self.upload_bytes, url = %self.upload_url, "Upload finished");
        Ok(())
    }
}
