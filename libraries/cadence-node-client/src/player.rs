//! Per-guild player handle.

use crate::client::NodeInner;
use crate::types::{UpdatePlayer, UpdatePlayerTrack};
use async_trait::async_trait;
use cadence_core::{PlayerHandle, RoomId, Track};
use std::sync::Arc;

/// Player for one guild on one node.
pub(crate) struct LavalinkPlayer {
    node: Arc<NodeInner>,
    guild_id: RoomId,
}

impl LavalinkPlayer {
    pub(crate) fn new(node: Arc<NodeInner>, guild_id: RoomId) -> Self {
        Self { node, guild_id }
    }

    async fn update(&self, update: UpdatePlayer) -> cadence_core::Result<()> {
        Ok(self.node.update_player(&self.guild_id, &update).await?)
    }
}

#[async_trait]
impl PlayerHandle for LavalinkPlayer {
    async fn play(&self, track: &Track) -> cadence_core::Result<()> {
        self.update(UpdatePlayer {
            track: Some(UpdatePlayerTrack {
                encoded: Some(track.encoded().to_string()),
            }),
            paused: Some(false),
            ..UpdatePlayer::default()
        })
        .await
    }

    async fn pause(&self, paused: bool) -> cadence_core::Result<()> {
        self.update(UpdatePlayer {
            paused: Some(paused),
            ..UpdatePlayer::default()
        })
        .await
    }

    async fn stop(&self) -> cadence_core::Result<()> {
        self.update(UpdatePlayer {
            track: Some(UpdatePlayerTrack { encoded: None }),
            ..UpdatePlayer::default()
        })
        .await
    }

    async fn set_volume(&self, volume: u8) -> cadence_core::Result<()> {
        self.update(UpdatePlayer {
            volume: Some(volume),
            ..UpdatePlayer::default()
        })
        .await
    }

    async fn destroy(&self) -> cadence_core::Result<()> {
        Ok(self.node.destroy_player(&self.guild_id).await?)
    }
}
