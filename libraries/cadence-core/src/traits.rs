//! Core traits for Cadence
//!
//! The playback core never talks to an audio node directly. It consumes
//! these capabilities, implemented by `cadence-node-client` in production
//! and by [`crate::testing::FakeEngine`] in tests.

use crate::error::Result;
use crate::types::{ChannelId, ResolveResult, RoomId, Track, UserId};
use async_trait::async_trait;

/// Audio backend capable of resolving queries and opening room players
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Turn a text query or link into playable tracks
    ///
    /// # Errors
    /// Returns an error if the node is unreachable or fails to load the query.
    /// An empty result is `Ok(ResolveResult::NoMatch)`, not an error.
    async fn resolve(&self, query: &str, requester: &UserId) -> Result<ResolveResult>;

    /// Open a player for a room
    ///
    /// Voice-channel membership of the bot itself is negotiated by the gateway;
    /// the channels are passed so the node can associate them with the player.
    async fn connect(
        &self,
        room_id: &RoomId,
        voice_channel_id: &ChannelId,
        text_channel_id: &ChannelId,
    ) -> Result<Box<dyn PlayerHandle>>;
}

/// Per-room player opened by [`PlaybackEngine::connect`]
///
/// Every call is a request to the node; completion is reported back through
/// [`crate::EngineEvent`]s rather than return values.
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Start playing `track`, replacing whatever is playing
    ///
    /// The player always starts unpaused, even if it was paused before.
    async fn play(&self, track: &Track) -> Result<()>;

    /// Pause (`true`) or resume (`false`)
    async fn pause(&self, paused: bool) -> Result<()>;

    /// Stop the current track; the node answers with a track-end event
    async fn stop(&self) -> Result<()>;

    /// Set the output volume (0-100)
    async fn set_volume(&self, volume: u8) -> Result<()>;

    /// Tear down the player and release node resources
    async fn destroy(&self) -> Result<()>;
}
