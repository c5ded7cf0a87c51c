//! Server configuration loading from file and environment variables.
//!
//! The configuration is read once at startup and handed to the router
//! inside [`AppState`](crate::AppState); handlers never read the
//! environment themselves.

use govi_voice::LiveKitConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LiveKit credentials used to sign participant tokens.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Optional separate backend that connection details are proxied from.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Cross-origin settings.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Per-IP limits on the credential routes.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "govi_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Upstream backend settings.
///
/// When `connection_details_url` is set the endpoint relays that backend's
/// document instead of signing tokens locally.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Full URL answering `GET` with a connection-details document.
    #[serde(default)]
    pub connection_details_url: Option<String>,

    /// Full URL accepting `POST` to start the assistant worker.
    #[serde(default)]
    pub worker_start_url: Option<String>,

    /// Timeout for upstream requests, in milliseconds.
    #[serde(default = "default_backend_timeout_ms")]
    pub timeout_ms: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials.
    #[serde(default = "default_cors_origins")]
    pub origins: Vec<String>,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per minute per client IP on credential routes. `0` disables.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend_timeout_ms() -> u64 {
    10_000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_requests_per_minute() -> u32 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            connection_details_url: None,
            worker_start_url: None,
            timeout_ms: default_backend_timeout_ms(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `GOVI_HOST` overrides `server.host`
/// - `GOVI_PORT` overrides `server.port`
/// - `GOVI_LOG_LEVEL` overrides `logging.level`
/// - `GOVI_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `GOVI_LIVEKIT_URL`, `GOVI_LIVEKIT_API_KEY`, `GOVI_LIVEKIT_API_SECRET`
///   override the `livekit` credentials
/// - `GOVI_BACKEND_CONNECTION_DETAILS_URL` overrides `backend.connection_details_url`
/// - `GOVI_BACKEND_WORKER_URL` overrides `backend.worker_start_url`
/// - `GOVI_CORS_ORIGINS` overrides `cors.origins` (comma-separated)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
///
/// Split out from [`load_config`] so overrides can be exercised without
/// mutating the process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("GOVI_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("GOVI_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = lookup("GOVI_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("GOVI_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(url) = lookup("GOVI_LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(key) = lookup("GOVI_LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Some(secret) = lookup("GOVI_LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Some(url) = lookup("GOVI_BACKEND_CONNECTION_DETAILS_URL") {
        config.backend.connection_details_url = non_blank(url);
    }
    if let Some(url) = lookup("GOVI_BACKEND_WORKER_URL") {
        config.backend.worker_start_url = non_blank(url);
    }
    if let Some(origins) = lookup("GOVI_CORS_ORIGINS") {
        config.cors.origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_when_file_missing() {
        let config = load_config(Some("/nonexistent/govi-config.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.livekit.token_ttl_seconds, 900);
        assert!(config.backend.connection_details_url.is_none());
        assert_eq!(config.cors.origins.len(), 2);
    }

    #[test]
    fn parses_toml_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[livekit]
url = "wss://rt.example.com"
api_key = "key"
api_secret = "secret"

[livekit.turn_detection]
threshold = 0.7

[backend]
worker_start_url = "http://backend:8000/start-worker"

[cors]
origins = ["https://app.example.com"]
"#
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.livekit.url, "wss://rt.example.com");
        assert!(config.livekit.turn_detection.is_some());
        assert_eq!(
            config.backend.worker_start_url.as_deref(),
            Some("http://backend:8000/start-worker")
        );
        assert_eq!(config.cors.origins, vec!["https://app.example.com"]);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            load_config(file.path().to_str()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("GOVI_PORT", "9999"),
            ("GOVI_LOG_JSON", "1"),
            ("GOVI_LIVEKIT_URL", "wss://env.example.com"),
            ("GOVI_LIVEKIT_API_KEY", "env-key"),
            ("GOVI_LIVEKIT_API_SECRET", "env-secret"),
            ("GOVI_BACKEND_CONNECTION_DETAILS_URL", " "),
            ("GOVI_CORS_ORIGINS", "https://a.example.com, https://b.example.com,"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.backend.connection_details_url = Some("http://old".to_string());
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9999);
        assert!(config.logging.json);
        assert_eq!(config.livekit.url, "wss://env.example.com");
        assert_eq!(config.livekit.api_key, "env-key");
        assert_eq!(config.livekit.api_secret, "env-secret");
        assert!(config.backend.connection_details_url.is_none());
        assert_eq!(
            config.cors.origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn unparsable_port_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| {
            (k == "GOVI_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.server.port, 3000);
    }
}
