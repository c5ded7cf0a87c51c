//! View state and the single reducer that updates it.

use crate::events::SessionEvent;
use govi_types::{AgentState, ConnectionDetails};

/// Everything the controls, error banner and visualizer draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionView {
    /// Assistant state as last reported by the session.
    pub agent_state: AgentState,
    /// Present while a session is active or being established.
    pub connection_details: Option<ConnectionDetails>,
    /// Message for the error banner.
    pub error_message: Option<String>,
    /// A connection-details fetch is in flight.
    pub busy: bool,
    /// Bumped on every reset; fetches started under an older generation are
    /// discarded when they complete.
    pub generation: u64,
}

impl SessionView {
    /// Applies one session event.
    ///
    /// This is the only place session callbacks change the view.
    pub fn reduce(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => {
                if !self.agent_state.is_connected() {
                    self.agent_state = AgentState::Initializing;
                }
            }
            SessionEvent::StateChanged(state) => self.agent_state = state,
            SessionEvent::Disconnected => self.reset(None),
            SessionEvent::Error(message) => self.reset(Some(message)),
            SessionEvent::MediaFailure(message) => self.reset(Some(format!(
                "could not access the microphone: {message}. Grant microphone permission and try again."
            ))),
        }
    }

    /// Returns to the disconnected baseline, dropping stored credentials.
    pub(crate) fn reset(&mut self, error_message: Option<String>) {
        self.agent_state = AgentState::Disconnected;
        self.connection_details = None;
        self.error_message = error_message;
        self.generation = self.generation.wrapping_add(1);
    }

    /// The connect button is shown.
    pub fn show_connect(&self) -> bool {
        self.agent_state == AgentState::Disconnected
    }

    /// The connect button is shown and clickable.
    ///
    /// Held details mean the session is about to connect with them.
    pub fn connect_enabled(&self) -> bool {
        self.show_connect() && !self.busy && self.connection_details.is_none()
    }

    /// Disconnect button and session controls are shown.
    pub fn show_session_controls(&self) -> bool {
        self.agent_state.is_connected()
    }

    /// The realtime session should be (or stay) connected.
    pub fn session_enabled(&self) -> bool {
        self.connection_details.is_some()
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
