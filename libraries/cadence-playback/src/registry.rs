//! Room → session registry
//!
//! At most one live session per room. Creation is insert-if-absent under the
//! map's write lock, so two concurrent `play` commands for a new room end up
//! sharing one session instead of racing to build two.
//!
//! Lock order is always session → registry: code holding a session guard may
//! take the registry lock (to remove itself), never the other way round.
//! No engine call is made while the registry lock is held.

use crate::error::{PlaybackError, Result};
use crate::session::PlaybackSession;
use crate::types::PlaybackConfig;
use cadence_core::{ChannelId, RoomId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

/// A registry entry: immutable room addressing plus the locked session
///
/// The ids are readable without taking the session lock, which lets
/// precondition checks run while another command for the room is in flight.
#[derive(Debug)]
pub struct SessionSlot {
    room_id: RoomId,
    voice_channel_id: ChannelId,
    text_channel_id: ChannelId,
    session: Mutex<PlaybackSession>,
}

impl SessionSlot {
    fn new(
        room_id: RoomId,
        voice_channel_id: ChannelId,
        text_channel_id: ChannelId,
        config: &PlaybackConfig,
    ) -> Self {
        let session = PlaybackSession::new(
            room_id.clone(),
            voice_channel_id.clone(),
            text_channel_id.clone(),
            config,
        );
        Self {
            room_id,
            voice_channel_id,
            text_channel_id,
            session: Mutex::new(session),
        }
    }

    /// Wait for exclusive access; commands queue here in arrival order
    pub async fn lock(&self) -> MutexGuard<'_, PlaybackSession> {
        self.session.lock().await
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn voice_channel_id(&self) -> &ChannelId {
        &self.voice_channel_id
    }

    pub fn text_channel_id(&self) -> &ChannelId {
        &self.text_channel_id
    }

    /// Ended and not busy, so safe to replace
    fn is_stale(&self) -> bool {
        self.session
            .try_lock()
            .map(|session| session.is_ended())
            .unwrap_or(false)
    }
}

/// Shared handle to a registry entry
pub type SharedSession = Arc<SessionSlot>;

/// Concurrent map of live sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<RoomId, SharedSession>>,
    config: PlaybackConfig,
}

impl SessionRegistry {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Insert a new `Connecting` session
    ///
    /// Fails with `SessionAlreadyExists` when a live session is present. An
    /// ended entry that nobody holds is replaced.
    pub async fn create(
        &self,
        room_id: &RoomId,
        voice_channel_id: ChannelId,
        text_channel_id: ChannelId,
    ) -> Result<SharedSession> {
        let mut sessions = self.sessions.write().await;
        if live_entry(&sessions, room_id).is_some() {
            return Err(PlaybackError::SessionAlreadyExists(room_id.clone()));
        }
        Ok(self.insert(&mut sessions, room_id, voice_channel_id, text_channel_id))
    }

    /// Existing session, or a freshly created one
    ///
    /// The flag is `true` when this call created it. Both the lookup and the
    /// insert happen under one write lock.
    pub async fn get_or_create(
        &self,
        room_id: &RoomId,
        voice_channel_id: ChannelId,
        text_channel_id: ChannelId,
    ) -> (SharedSession, bool) {
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = live_entry(&sessions, room_id) {
            return (existing, false);
        }
        let slot = self.insert(&mut sessions, room_id, voice_channel_id, text_channel_id);
        (slot, true)
    }

    fn insert(
        &self,
        sessions: &mut HashMap<RoomId, SharedSession>,
        room_id: &RoomId,
        voice_channel_id: ChannelId,
        text_channel_id: ChannelId,
    ) -> SharedSession {
        let slot = Arc::new(SessionSlot::new(
            room_id.clone(),
            voice_channel_id,
            text_channel_id,
            &self.config,
        ));
        if sessions.insert(room_id.clone(), Arc::clone(&slot)).is_some() {
            debug!(room = %room_id, "Replaced ended session");
        }
        info!(room = %room_id, "Session created");
        slot
    }

    pub async fn get(&self, room_id: &RoomId) -> Option<SharedSession> {
        self.sessions.read().await.get(room_id).cloned()
    }

    /// Remove `slot` if it is still the entry for `room_id`
    ///
    /// A newer session created after `slot` ended is left alone.
    pub async fn remove(&self, room_id: &RoomId, slot: &SharedSession) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(room_id) {
            Some(current) if Arc::ptr_eq(current, slot) => {
                sessions.remove(room_id);
                debug!(room = %room_id, "Session removed");
                true
            }
            _ => false,
        }
    }

    /// Destroy a session the caller holds and drop its entry
    pub async fn retire(&self, slot: &SharedSession, session: &mut PlaybackSession) {
        session.destroy().await;
        self.remove(slot.room_id(), slot).await;
    }

    /// Number of entries
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Every entry, for broadcasts
    pub async fn slots(&self) -> Vec<SharedSession> {
        self.sessions.read().await.values().cloned().collect()
    }
}

/// Entry for `room_id` unless it is ended and idle
fn live_entry(sessions: &HashMap<RoomId, SharedSession>, room_id: &RoomId) -> Option<SharedSession> {
    sessions
        .get(room_id)
        .filter(|slot| !slot.is_stale())
        .cloned()
}
