//! Shared types for the Govi voice-assistant gateway.
//!
//! This crate holds the wire documents exchanged between the
//! connection-details endpoint and its clients, the voice-activity-detection
//! settings that ride along inside participant tokens, and the assistant
//! state reported by the realtime session.
//!
//! Both `govi-server` and `govi-client` depend on it; it depends on nothing
//! but `serde`.

pub mod session;
pub mod voice;

pub use session::AgentState;
pub use voice::TurnDetection;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything a client needs to join a realtime room.
///
/// A value is minted per connection attempt and is only valid until its
/// token expires or the session ends. It is never persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    /// Address of the realtime service (`wss://...`).
    pub server_url: String,
    /// Room generated for this attempt.
    #[serde(default)]
    pub room_name: String,
    /// Participant identity generated for this attempt.
    #[serde(default)]
    pub participant_name: String,
    /// Signed, time-boxed access token.
    pub participant_token: String,
}

impl std::fmt::Debug for ConnectionDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDetails")
            .field("server_url", &self.server_url)
            .field("room_name", &self.room_name)
            .field("participant_name", &self.participant_name)
            .field("participant_token", &"[REDACTED]")
            .finish()
    }
}

/// Connection details as received from an endpoint, before validation.
///
/// Every field is optional so that a document missing required fields
/// still deserializes and can be reported as a validation failure rather
/// than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConnectionDetails {
    pub server_url: Option<String>,
    pub room_name: Option<String>,
    pub participant_name: Option<String>,
    pub participant_token: Option<String>,
}

/// A connection-details document that cannot be used to connect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("connection details are missing `{0}`")]
    MissingField(&'static str),
}

impl TryFrom<PartialConnectionDetails> for ConnectionDetails {
    type Error = ValidationError;

    /// Only `serverUrl` and `participantToken` are required; the room and
    /// participant names are informational.
    fn try_from(partial: PartialConnectionDetails) -> Result<Self, Self::Error> {
        let server_url = non_empty(partial.server_url)
            .ok_or(ValidationError::MissingField("serverUrl"))?;
        let participant_token = non_empty(partial.participant_token)
            .ok_or(ValidationError::MissingField("participantToken"))?;

        Ok(Self {
            server_url,
            room_name: partial.room_name.unwrap_or_default(),
            participant_name: partial.participant_name.unwrap_or_default(),
            participant_token,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
