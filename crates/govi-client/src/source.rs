//! Where connection details come from.

use crate::config::ClientConfig;
use crate::error::BootstrapError;
use govi_types::PartialConnectionDetails;
use serde::Deserialize;
use std::future::Future;

/// Supplies connection-details documents to the bootstrap.
///
/// `fetch` returns the unvalidated document; the controller decides whether
/// it is usable.
pub trait ConnectionDetailsSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<PartialConnectionDetails, BootstrapError>> + Send;

    /// Asks the backend to start the assistant worker without waiting for
    /// the result. The default does nothing.
    fn start_worker(&self) {}
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Fetches connection details over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConnectionSource {
    client: reqwest::Client,
    details_url: String,
    worker_start_url: Option<String>,
}

impl HttpConnectionSource {
    pub fn new(config: &ClientConfig) -> Result<Self, BootstrapError> {
        Ok(Self::with_client(
            reqwest::Client::new(),
            config.connection_details_url()?,
            config.worker_start_url()?,
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        details_url: impl Into<String>,
        worker_start_url: Option<String>,
    ) -> Self {
        Self {
            client,
            details_url: details_url.into(),
            worker_start_url,
        }
    }

    pub fn details_url(&self) -> &str {
        &self.details_url
    }
}

impl ConnectionDetailsSource for HttpConnectionSource {
    async fn fetch(&self) -> Result<PartialConnectionDetails, BootstrapError> {
        tracing::debug!(url = %self.details_url, "fetching connection details");

        let resp = self
            .client
            .get(&self.details_url)
            .send()
            .await
            .map_err(|e| BootstrapError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            return Err(BootstrapError::Status {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<PartialConnectionDetails>()
            .await
            .map_err(|e| BootstrapError::Decode(e.to_string()))
    }

    fn start_worker(&self) {
        let Some(url) = self.worker_start_url.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.post(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(%url, "worker start requested");
                }
                Ok(resp) => {
                    tracing::warn!(%url, status = %resp.status(), "worker start rejected");
                }
                Err(e) => {
                    tracing::warn!(%url, "worker start failed: {}", e);
                }
            }
        });
    }
}
