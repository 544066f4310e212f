//! Retrieval of manifests and starter archives
//!
//! Remote locations are fetched over HTTP(S); `file://` URLs are read from
//! disk so a locally built starter can be exercised end to end without
//! publishing it.

use crate::error::{Result, ScaffoldError};
use std::future::Future;
use url::Url;

/// Capability to retrieve the bytes behind a URL
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetcher backed by `reqwest`, with `file://` support
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

fn fetch_error(url: &Url, reason: impl ToString) -> ScaffoldError {
    ScaffoldError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| fetch_error(url, "not a local file path"))?;
            return tokio::fs::read(&path)
                .await
                .map_err(|e| fetch_error(url, e));
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        if !response.status().is_success() {
            return Err(fetch_error(url, format!("HTTP {}", response.status())));
        }

        let bytes = response.bytes().await.map_err(|e| fetch_error(url, e))?;
        Ok(bytes.to_vec())
    }
}
