/// Error types for the bot service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_core::EngineError;
use cadence_playback::PlaybackError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// HTTP-level failures of the bridge API and process setup
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Text shown when something failed on our side or in the audio node
pub const GENERIC_FAILURE: &str =
    "An error occurred while playing the track! Please try again later.";

/// Why a command or button produced no result
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Bad input or unmet precondition; the text goes to the user as-is
    #[error("{0}")]
    Validation(String),

    /// The room has no live session
    #[error("{0}")]
    NoSession(&'static str),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

impl From<EngineError> for DispatchError {
    fn from(err: EngineError) -> Self {
        DispatchError::Playback(PlaybackError::EngineUnavailable(err))
    }
}

impl DispatchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DispatchError::Validation(msg.into())
    }

    /// Failures the user cannot fix; these are logged
    pub fn is_internal(&self) -> bool {
        match self {
            DispatchError::Validation(_) | DispatchError::NoSession(_) => false,
            DispatchError::Playback(e) => {
                e.is_engine_error() || matches!(e, PlaybackError::SessionAlreadyExists(_))
            }
            DispatchError::Internal(_) => true,
        }
    }

    /// Text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::Validation(msg) => msg.clone(),
            DispatchError::NoSession(msg) => (*msg).to_string(),
            DispatchError::Playback(e) => playback_message(e),
            DispatchError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

fn playback_message(err: &PlaybackError) -> String {
    match err {
        PlaybackError::SessionEnded => "Nothing is playing!".to_string(),
        PlaybackError::NoStateChange { paused: true } => {
            "The player is already paused!".to_string()
        }
        PlaybackError::NoStateChange { paused: false } => {
            "The player is already playing!".to_string()
        }
        PlaybackError::EmptyQueue => "Queue is empty!".to_string(),
        PlaybackError::IndexOutOfRange { len, .. } => {
            format!("Please provide a valid track position between 1 and {len}!")
        }
        PlaybackError::QueueFull { max } => {
            format!("The queue is full! It can hold up to {max} tracks.")
        }
        PlaybackError::InsufficientTracks { .. } => {
            "Not enough tracks in queue to shuffle!".to_string()
        }
        PlaybackError::InvalidVolume(_) => {
            "Please provide a valid volume between 0 and 100!".to_string()
        }
        PlaybackError::NoResults => {
            "No results found! Try with a different search term.".to_string()
        }
        PlaybackError::NoPreviousTrack => "No previous track found!".to_string(),
        PlaybackError::SessionAlreadyExists(_) | PlaybackError::EngineUnavailable(_) => {
            GENERIC_FAILURE.to_string()
        }
    }
}
