//! Error types for playback sessions

use cadence_core::{EngineError, RoomId};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A live session already exists for the room
    #[error("A session already exists for room {0}")]
    SessionAlreadyExists(RoomId),

    /// The session was destroyed while the command waited for it
    #[error("Session has ended")]
    SessionEnded,

    /// Pause/resume requested for the state the player is already in
    #[error("Player is already {}", if *.paused { "paused" } else { "playing" })]
    NoStateChange { paused: bool },

    /// No pending track to advance to
    #[error("Queue is empty")]
    EmptyQueue,

    /// Position outside the pending portion
    #[error("Index {index} out of range for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Queue already holds the configured maximum
    #[error("Queue is full (max {max} tracks)")]
    QueueFull { max: usize },

    /// Shuffle needs at least two pending tracks
    #[error("Not enough tracks to shuffle ({len})")]
    InsufficientTracks { len: usize },

    /// Volume outside 0-100 or not a number
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    /// The resolver found nothing for the query
    #[error("No results")]
    NoResults,

    /// No track has been played before the current one
    #[error("No previous track")]
    NoPreviousTrack,

    /// The engine could not be reached or refused the request
    #[error(transparent)]
    EngineUnavailable(#[from] EngineError),
}

impl PlaybackError {
    /// Precondition violations that the user can fix
    pub fn is_state_error(&self) -> bool {
        !self.is_engine_error()
    }

    /// Failures that originate in the audio engine
    pub fn is_engine_error(&self) -> bool {
        matches!(self, PlaybackError::EngineUnavailable(_))
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_state_change_names_current_state() {
        assert_eq!(
            PlaybackError::NoStateChange { paused: true }.to_string(),
            "Player is already paused"
        );
        assert_eq!(
            PlaybackError::NoStateChange { paused: false }.to_string(),
            "Player is already playing"
        );
    }

    #[test]
    fn engine_errors_are_classified() {
        let err = PlaybackError::from(EngineError::unavailable("down"));
        assert!(err.is_engine_error());
        assert!(!err.is_state_error());
        assert!(PlaybackError::EmptyQueue.is_state_error());
    }
}
