//! Core types for playback sessions

use serde::{Deserialize, Serialize};

/// Loop mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Stop when the queue runs out
    #[default]
    None,

    /// Re-append each finished track to the tail
    Queue,
}

impl LoopMode {
    /// The other mode
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            LoopMode::None => LoopMode::Queue,
            LoopMode::Queue => LoopMode::None,
        }
    }
}

/// Session lifecycle state
///
/// ```text
/// Connecting ──connect──▶ Idle ──play──▶ Playing ◀──pause──▶ Paused
///                           ▲               │                  │
///                           └──engine fail──┘                  │
///            any ──destroy──▶ Ended (terminal) ◀───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Waiting for the engine to open a player
    Connecting,

    /// Player open, nothing playing
    Idle,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Destroyed; the registry entry is being or has been removed
    Ended,
}

impl SessionState {
    /// Playing or paused
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Paused)
    }
}

/// Configuration for playback sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum number of pending tracks per room (default: 100)
    pub max_queue_size: usize,

    /// Volume applied when a player opens (0-100, default: 50)
    pub default_volume: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 100,
            default_volume: 50,
        }
    }
}
