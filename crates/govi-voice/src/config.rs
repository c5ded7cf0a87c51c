use govi_types::TurnDetection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Upper bound on participant token lifetime (15 minutes).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 15 * 60;

fn default_token_ttl_seconds() -> u64 {
    MAX_TOKEN_TTL_SECONDS
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// JWT TTL in seconds for participant tokens. Default and maximum: 900.
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
    /// Server VAD settings embedded as participant metadata. `None` sends no
    /// metadata and leaves turn detection to the worker's defaults.
    #[serde(default)]
    pub turn_detection: Option<TurnDetection>,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
            turn_detection: None,
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("turn_detection", &self.turn_detection)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            ..Self::default()
        }
    }

    /// Names of required settings that are empty, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("url", &self.url),
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Token lifetime actually used when signing.
    ///
    /// Zero falls back to the default; anything above the cap is clamped.
    pub fn token_ttl(&self) -> Duration {
        let secs = match self.token_ttl_seconds {
            0 => default_token_ttl_seconds(),
            s => s.min(MAX_TOKEN_TTL_SECONDS),
        };
        Duration::from_secs(secs)
    }
}
