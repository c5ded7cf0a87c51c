//! Realtime credential issuing for the Govi gateway.
//!
//! Wraps LiveKit access-token signing: generates a room and participant
//! identity per connection attempt, scopes the token to what a voice
//! assistant session needs (join, microphone publish, data publish,
//! subscribe), and bundles everything into a
//! [`ConnectionDetails`](govi_types::ConnectionDetails) document.

pub mod config;
pub mod error;
pub mod names;
pub mod service;

pub use config::{LiveKitConfig, MAX_TOKEN_TTL_SECONDS};
pub use error::VoiceError;
pub use names::{generate_participant_identity, generate_room_name};
pub use service::TokenService;
