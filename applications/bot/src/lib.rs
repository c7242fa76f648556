//! Cadence Bot Library
//!
//! Chat-facing half of the music bot: command parsing, the dispatcher that
//! drives per-room playback sessions, message rendering, and the HTTP API
//! the gateway bridge talks to.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod inbound;
pub mod pages;
pub mod render;
pub mod state;

// Re-export commonly used types for convenience
pub use command::{ButtonAction, Command};
pub use config::BotConfig;
pub use dispatcher::{Controller, NodeSessions};
pub use error::{DispatchError, Result, ServerError};
pub use inbound::{InteractionEvent, MessageEvent};
pub use render::{Delivery, OutboundMessage, Target};
pub use state::AppState;
