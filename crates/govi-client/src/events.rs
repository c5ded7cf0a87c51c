use govi_types::AgentState;
use tokio::sync::mpsc;

/// Buffered events between the realtime SDK adapter and the controller.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Callbacks from the realtime session, as one tagged stream.
///
/// The SDK adapter translates each of its callbacks into one of these and
/// sends it on the channel returned by [`event_channel`]; a single consumer
/// folds them into the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The room connection is established.
    Connected,
    /// The session ended normally (user hang-up or remote close).
    Disconnected,
    /// The session reported a fault.
    Error(String),
    /// Microphone acquisition failed (e.g. permission denied).
    MediaFailure(String),
    /// The assistant's state changed.
    StateChanged(AgentState),
}

/// Creates the inbound event channel.
pub fn event_channel() -> (mpsc::Sender<SessionEvent>, mpsc::Receiver<SessionEvent>) {
    mpsc::channel(DEFAULT_EVENT_CAPACITY)
}
