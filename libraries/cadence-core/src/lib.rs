//! Cadence Core
//!
//! Shared building blocks for the Cadence playback controller.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackInfo`, `ResolveResult`, room/channel/user ids
//! - **Engine Capability**: `PlaybackEngine` and `PlayerHandle`, implemented by
//!   the audio node client and by test doubles
//! - **Engine Events**: `EngineEvent`, the typed callbacks a node emits
//! - **Error Handling**: `EngineError` and its `Result` alias
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Track, TrackInfo, UserId};
//!
//! let info = TrackInfo::new("QAAAjQIAJVJpY2sgQXN0bGV5", "Never Gonna Give You Up")
//!     .with_author("Rick Astley")
//!     .with_duration_ms(213_000);
//!
//! let track = Track::new(info, UserId::new("81384788765712384"));
//! assert!(!track.is_live());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use events::{EngineEvent, TrackEndReason};
pub use traits::{PlaybackEngine, PlayerHandle};
pub use types::{
    ChannelId, MessageId, PlaylistInfo, ResolveResult, RoomId, Track, TrackInfo, UserId,
};
