//! Connect/disconnect orchestration around the realtime session.

use crate::error::BootstrapError;
use crate::events::SessionEvent;
use crate::source::ConnectionDetailsSource;
use crate::view::SessionView;
use govi_types::ConnectionDetails;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};

/// Result of a connect attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Details are stored and the session may connect.
    Ready(ConnectionDetails),
    /// Another attempt was already in flight; no request was made.
    AlreadyInFlight,
    /// Details are already held for the current session; no request was
    /// made and the stored details are untouched.
    AlreadyConnected,
    /// The session was reset while the fetch was in flight; the response
    /// was dropped.
    Superseded,
}

/// Owns the client-side session state.
///
/// The busy flag has a single writer: whichever `connect` call wins the
/// compare-exchange. It is released when that call's guard drops, including
/// when the future is cancelled mid-fetch.
pub struct SessionController<S> {
    source: S,
    view: watch::Sender<SessionView>,
    busy: AtomicBool,
}

struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    view: &'a watch::Sender<SessionView>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.view.send_modify(|v| v.busy = false);
    }
}

impl<S: ConnectionDetailsSource> SessionController<S> {
    pub fn new(source: S) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            source,
            view,
            busy: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current view state.
    pub fn snapshot(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Receives every view change, for UI shells to redraw from.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    /// Details the realtime session should connect with, if any.
    pub fn session_target(&self) -> Option<ConnectionDetails> {
        self.view.borrow().connection_details.clone()
    }

    /// Fetches connection details and stores them.
    ///
    /// At most one fetch runs at a time; a second call while one is in
    /// flight returns [`ConnectOutcome::AlreadyInFlight`] without touching
    /// the network, and a call while details are still held returns
    /// [`ConnectOutcome::AlreadyConnected`]. Failures are also written to
    /// the view's error banner.
    pub async fn connect(&self) -> Result<ConnectOutcome, BootstrapError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("connect ignored, an attempt is already in flight");
            return Ok(ConnectOutcome::AlreadyInFlight);
        }
        let _guard = BusyGuard {
            flag: &self.busy,
            view: &self.view,
        };

        if self.view.borrow().connection_details.is_some() {
            tracing::debug!("connect ignored, connection details are already held");
            return Ok(ConnectOutcome::AlreadyConnected);
        }

        let mut generation = 0;
        self.view.send_modify(|v| {
            v.busy = true;
            v.error_message = None;
            generation = v.generation;
        });

        let result = self
            .source
            .fetch()
            .await
            .and_then(|partial| ConnectionDetails::try_from(partial).map_err(Into::into));

        let mut superseded = false;
        self.view.send_modify(|v| {
            if v.generation != generation {
                superseded = true;
                return;
            }
            match &result {
                Ok(details) => {
                    v.connection_details = Some(details.clone());
                    v.error_message = None;
                }
                Err(e) => {
                    v.connection_details = None;
                    v.error_message = Some(e.to_string());
                }
            }
        });

        if superseded {
            tracing::info!(generation, "discarding connection details from a reset session");
            return Ok(ConnectOutcome::Superseded);
        }

        match result {
            Ok(details) => {
                tracing::info!(
                    room = %details.room_name,
                    participant = %details.participant_name,
                    "connection details ready"
                );
                self.source.start_worker();
                Ok(ConnectOutcome::Ready(details))
            }
            Err(e) => {
                tracing::warn!("connect attempt failed: {}", e);
                Err(e)
            }
        }
    }

    /// User-initiated hang-up.
    pub fn disconnect(&self) {
        self.handle_event(SessionEvent::Disconnected);
    }

    /// Folds one session event into the view.
    pub fn handle_event(&self, event: SessionEvent) {
        tracing::debug!(?event, "session event");
        self.view.send_modify(|v| v.reduce(event));
    }

    /// Consumes session events until every sender is dropped.
    pub async fn run_events(&self, mut events: mpsc::Receiver<SessionEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        tracing::debug!("session event channel closed");
    }
}
