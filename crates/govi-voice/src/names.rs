//! Per-attempt room and participant names.
//!
//! Names are random rather than coordinated: two attempts colliding is
//! possible but unlikely (36^8 suffixes), and a collision only means two
//! participants share a room.

use rand::distributions::Alphanumeric;
use rand::Rng;

const ROOM_PREFIX: &str = "voice_assistant_room";
const PARTICIPANT_PREFIX: &str = "voice_assistant_user";
const SUFFIX_LEN: usize = 8;

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Returns a fresh room name, e.g. `voice_assistant_room_k3j9x0qa`.
pub fn generate_room_name() -> String {
    format!("{ROOM_PREFIX}_{}", random_suffix())
}

/// Returns a fresh participant identity, e.g. `voice_assistant_user_0p2mzd7c`.
pub fn generate_participant_identity() -> String {
    format!("{PARTICIPANT_PREFIX}_{}", random_suffix())
}
