//! Client-side connection bootstrap for the Govi voice assistant.
//!
//! The realtime SDK does the actual media work. This crate owns everything
//! around it: fetching connection details, guarding against duplicate
//! attempts, folding the SDK's callbacks into one view state, and deriving
//! what the controls and the audio visualizer should show.
//!
//! It does not render anything; UI shells subscribe to
//! [`SessionController::subscribe`] and draw from [`SessionView`].

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod events;
pub mod source;
pub mod view;
pub mod visualizer;

pub use bootstrap::{ConnectOutcome, SessionController};
pub use config::ClientConfig;
pub use error::BootstrapError;
pub use events::{event_channel, SessionEvent};
pub use source::{ConnectionDetailsSource, HttpConnectionSource};
pub use view::SessionView;
pub use visualizer::BarVisualizer;
