//! HTTP client implementation for the bridge
//!
//! This module provides the outbound collaborator used to fetch the search
//! results page and each movie's detail page. It is a black box returning
//! markup text or failing.

use std::future::Future;

use reqwest::Client as ReqwestClient;
use tracing::{debug, error, instrument};

use crate::config::BridgeConfig;
use crate::error::{Error, Result};

/// Fetches raw page markup for a URL
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP fetcher backed by reqwest
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    /// The underlying reqwest client
    client: ReqwestClient,
}

impl HttpFetcher {
    /// Create a new fetcher using the configured user agent and timeout
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Sending GET request to {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Upstream error: {} for {}", status, url);
            return Err(Error::Status {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
