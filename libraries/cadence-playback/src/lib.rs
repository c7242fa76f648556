//! Cadence - Playback Sessions
//!
//! The playback core of Cadence: one independent session per chat room.
//!
//! This crate provides:
//! - Bounded queue with current/previous tracking (`Queue`)
//! - Loop modes (None, Queue) and Fisher-Yates shuffle of pending tracks
//! - Volume validation (0-100)
//! - The per-room state machine (`PlaybackSession`)
//! - The room → session registry with insert-if-absent semantics (`SessionRegistry`)
//!
//! # Architecture
//!
//! `cadence-playback` never talks to an audio node directly:
//! - Engine access goes through `cadence_core::PlaybackEngine` / `PlayerHandle`
//! - No chat-platform types; rooms and channels are opaque ids
//! - No rendering; callers read snapshots and format them
//!
//! Each session sits behind its own async mutex. Holding the guard for the
//! whole of a command (including engine awaits) is what serializes commands
//! for one room while leaving other rooms untouched.
//!
//! # Example: Queue
//!
//! ```rust
//! use cadence_core::{Track, TrackInfo, UserId};
//! use cadence_playback::{LoopMode, Queue};
//!
//! let mut queue = Queue::new(100);
//! for id in ["a", "b", "c"] {
//!     let info = TrackInfo::new(id, id).with_duration_ms(1000);
//!     queue.enqueue(Track::new(info, UserId::new("1"))).unwrap();
//! }
//!
//! queue.set_loop(LoopMode::Queue);
//! assert_eq!(queue.advance().map(|t| t.encoded()), Some("a"));
//! assert_eq!(queue.len(), 2);
//! assert_eq!(queue.advance().map(|t| t.encoded()), Some("b"));
//! assert_eq!(queue.len(), 2); // "a" went back to the tail
//! ```
//!
//! # Example: Session lifecycle
//!
//! ```rust,no_run
//! use cadence_core::{ChannelId, PlaybackEngine, RoomId, UserId};
//! use cadence_playback::{PlaybackConfig, SessionRegistry};
//!
//! # async fn demo(engine: &dyn PlaybackEngine) -> cadence_playback::Result<()> {
//! let registry = SessionRegistry::new(PlaybackConfig::default());
//! let room = RoomId::new("guild");
//!
//! let slot = registry
//!     .create(&room, ChannelId::new("voice"), ChannelId::new("text"))
//!     .await?;
//!
//! let mut session = slot.lock().await;
//! session.connect(engine).await?;
//! let result = engine.resolve("never gonna give you up", &UserId::new("1")).await?;
//! session.enqueue_resolved(result, &UserId::new("1")).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod queue;
mod registry;
mod session;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use queue::{EnqueueOutcome, Queue, QueueSnapshot};
pub use registry::{SessionRegistry, SessionSlot, SharedSession};
pub use session::{
    Added, Enqueued, PlaybackSession, QueueEndOutcome, SessionSnapshot, TrackEndOutcome,
};
pub use types::{LoopMode, PlaybackConfig, SessionState};
pub use volume::Volume;
