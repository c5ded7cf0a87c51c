//! Client configuration.
//!
//! Only public, client-visible settings live here. LiveKit secrets never
//! reach the client.

use crate::error::BootstrapError;

/// Path of the connection-details route on the API base URL.
pub const DEFAULT_CONNECTION_DETAILS_PATH: &str = "/api/connection-details";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the gateway API, e.g. `https://govi.example.com`.
    pub api_base_url: String,
    /// Overrides the connection-details URL. Absolute, or relative to
    /// `api_base_url`.
    pub connection_details_endpoint: Option<String>,
    /// Worker-start URL, posted fire-and-forget after a successful fetch.
    /// Absolute, or relative to `api_base_url`.
    pub worker_start_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `GOVI_PUBLIC_API_BASE_URL`, `GOVI_PUBLIC_CONN_DETAILS_ENDPOINT`
    /// and `GOVI_PUBLIC_WORKER_START_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_base_url: non_blank("GOVI_PUBLIC_API_BASE_URL").unwrap_or_default(),
            connection_details_endpoint: non_blank("GOVI_PUBLIC_CONN_DETAILS_ENDPOINT"),
            worker_start_url: non_blank("GOVI_PUBLIC_WORKER_START_URL"),
        }
    }

    /// URL the bootstrap fetches connection details from.
    ///
    /// The explicit endpoint override wins over the default path.
    pub fn connection_details_url(&self) -> Result<String, BootstrapError> {
        let endpoint = self
            .connection_details_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_CONNECTION_DETAILS_PATH);
        self.resolve(endpoint)
    }

    /// Resolved worker-start URL, if one is configured.
    pub fn worker_start_url(&self) -> Result<Option<String>, BootstrapError> {
        self.worker_start_url
            .as_deref()
            .map(|url| self.resolve(url))
            .transpose()
    }

    fn resolve(&self, endpoint: &str) -> Result<String, BootstrapError> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(endpoint.to_string());
        }
        let base = self.api_base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(BootstrapError::Config(format!(
                "relative endpoint '{endpoint}' needs GOVI_PUBLIC_API_BASE_URL"
            )));
        }
        Ok(format!("{base}/{}", endpoint.trim_start_matches('/')))
    }
}
