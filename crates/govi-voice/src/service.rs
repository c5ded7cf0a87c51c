use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use crate::names::{generate_participant_identity, generate_room_name};
use govi_types::ConnectionDetails;
use livekit_api::access_token::{AccessToken, VideoGrants};

/// Track source a participant may publish: the microphone only.
const AUDIO_SOURCE: &str = "microphone";

#[derive(Debug, Clone)]
pub struct TokenService {
    config: LiveKitConfig,
}

impl TokenService {
    pub fn new(config: LiveKitConfig) -> Self {
        Self { config }
    }

    /// True when URL, key and secret are all present.
    pub fn is_enabled(&self) -> bool {
        self.config.missing_fields().is_empty()
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    pub fn config(&self) -> &LiveKitConfig {
        &self.config
    }

    /// Signs a participant token scoped to a single room.
    ///
    /// Grants are exactly: join `room_name`, publish microphone audio,
    /// publish data, subscribe.
    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
    ) -> Result<String, VoiceError> {
        self.ensure_configured()?;

        let mut token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_identity)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_publish_sources: vec![AUDIO_SOURCE.to_string()],
                can_publish_data: true,
                can_subscribe: true,
                ..Default::default()
            })
            .with_ttl(self.config.token_ttl());

        if let Some(vad) = &self.config.turn_detection {
            let metadata = vad.clone().normalized().to_metadata()?;
            token = token.with_metadata(&metadata);
        }

        token.to_jwt().map_err(VoiceError::LiveKit)
    }

    /// Mints a fresh [`ConnectionDetails`] document with a new room and
    /// participant identity.
    pub fn issue_connection_details(&self) -> Result<ConnectionDetails, VoiceError> {
        let room_name = generate_room_name();
        let participant_name = generate_participant_identity();
        let participant_token = self.generate_join_token(&room_name, &participant_name)?;

        tracing::debug!(
            room = %room_name,
            participant = %participant_name,
            ttl_secs = self.config.token_ttl().as_secs(),
            "issued participant token"
        );

        Ok(ConnectionDetails {
            server_url: self.config.url.clone(),
            room_name,
            participant_name,
            participant_token,
        })
    }

    fn ensure_configured(&self) -> Result<(), VoiceError> {
        let missing = self.config.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VoiceError::Config(format!(
                "missing livekit settings: {}",
                missing.join(", ")
            )))
        }
    }
}
