use govi_types::ValidationError;
use thiserror::Error;

/// Why a connect attempt produced no usable connection details.
///
/// The `Display` text is what the error banner shows.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("client configuration error: {0}")]
    Config(String),

    #[error("could not reach the connection service: {0}")]
    Request(String),

    /// Non-success status; `message` is the body's `error` field when present,
    /// otherwise the status reason.
    #[error("connection service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid connection service response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
