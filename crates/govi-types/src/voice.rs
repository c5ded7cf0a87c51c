//! Server-side voice-activity-detection settings.
//!
//! These are attached to a participant token as JSON metadata so that the
//! assistant worker joining the room can configure turn-taking without a
//! separate lookup.

use serde::{Deserialize, Serialize};

/// Server VAD parameters driving turn detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnDetection {
    /// Activation threshold in `0.0..=1.0`; higher needs louder speech.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Audio kept before detected speech starts, in milliseconds.
    #[serde(default = "default_prefix_padding_ms")]
    pub prefix_padding_ms: u32,
    /// Silence needed before a turn is considered finished, in milliseconds.
    #[serde(default = "default_silence_duration_ms")]
    pub silence_duration_ms: u32,
    /// Whether the assistant answers automatically at the end of a turn.
    #[serde(default = "default_create_response")]
    pub create_response: bool,
}

fn default_threshold() -> f32 {
    0.6
}

fn default_prefix_padding_ms() -> u32 {
    200
}

fn default_silence_duration_ms() -> u32 {
    500
}

fn default_create_response() -> bool {
    true
}

impl Default for TurnDetection {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            prefix_padding_ms: default_prefix_padding_ms(),
            silence_duration_ms: default_silence_duration_ms(),
            create_response: default_create_response(),
        }
    }
}

#[derive(Serialize)]
struct TaggedTurnDetection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    settings: &'a TurnDetection,
}

#[derive(Serialize)]
struct ParticipantMetadata<'a> {
    turn_detection: TaggedTurnDetection<'a>,
}

impl TurnDetection {
    /// Clamps the threshold into the accepted range.
    pub fn normalized(mut self) -> Self {
        self.threshold = self.threshold.clamp(0.0, 1.0);
        self
    }

    /// Renders the participant metadata document carried in a token.
    ///
    /// ```text
    /// {"turn_detection":{"type":"server_vad","threshold":0.6,...}}
    /// ```
    pub fn to_metadata(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ParticipantMetadata {
            turn_detection: TaggedTurnDetection {
                kind: "server_vad",
                settings: self,
            },
        })
    }
}
