//! In-memory engine double
//!
//! Records every request it receives so tests can assert on the exact
//! sequence of node calls. Clones share state, which lets a test keep one
//! copy for inspection while the code under test owns another.

use crate::error::{EngineError, Result};
use crate::traits::{PlaybackEngine, PlayerHandle};
use crate::types::{ChannelId, ResolveResult, RoomId, Track, TrackInfo, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One request observed by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `resolve(query)`
    Resolve { query: String },
    /// `connect(room)`
    Connect { room: RoomId },
    /// `play(track)` on a room player
    Play { room: RoomId, encoded: String },
    /// `pause(paused)` on a room player
    Pause { room: RoomId, paused: bool },
    /// `stop()` on a room player
    Stop { room: RoomId },
    /// `set_volume(volume)` on a room player
    SetVolume { room: RoomId, volume: u8 },
    /// `destroy()` on a room player
    Destroy { room: RoomId },
}

#[derive(Default)]
struct FakeState {
    calls: Mutex<Vec<EngineCall>>,
    results: Mutex<HashMap<String, ResolveResult>>,
    unavailable: AtomicBool,
    playback_failing: AtomicBool,
    paused: Mutex<HashSet<RoomId>>,
}

impl FakeState {
    fn record(&self, call: EngineCall) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }

    fn set_paused(&self, room: &RoomId, paused: bool) {
        let mut rooms = self
            .paused
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if paused {
            rooms.insert(room.clone());
        } else {
            rooms.remove(room);
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(EngineError::unavailable("fake node offline"))
        } else {
            Ok(())
        }
    }
}

/// Scriptable engine double
#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<FakeState>,
}

impl FakeEngine {
    /// Create a fake with no scripted results (every query resolves to `NoMatch`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result returned for `query`
    #[must_use]
    pub fn with_result(self, query: impl Into<String>, result: ResolveResult) -> Self {
        self.set_result(query, result);
        self
    }

    /// Script the result returned for `query`
    pub fn set_result(&self, query: impl Into<String>, result: ResolveResult) {
        self.state
            .results
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(query.into(), result);
    }

    /// Make `resolve` and `connect` fail with `EngineError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make player `play` calls fail with `EngineError::Unavailable`
    pub fn set_playback_failing(&self, failing: bool) {
        self.state.playback_failing.store(failing, Ordering::SeqCst);
    }

    /// Every call recorded so far
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether the node-side player for `room` is currently paused
    ///
    /// Set by `pause(true)`; cleared by `pause(false)` and by a successful
    /// `play`, which always starts unpaused.
    pub fn is_paused(&self, room: &RoomId) -> bool {
        self.state
            .paused
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(room)
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state
            .calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl PlaybackEngine for FakeEngine {
    async fn resolve(&self, query: &str, _requester: &UserId) -> Result<ResolveResult> {
        self.state.record(EngineCall::Resolve {
            query: query.to_string(),
        });
        self.state.check_available()?;

        let results = self
            .state
            .results
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(results.get(query).cloned().unwrap_or(ResolveResult::NoMatch))
    }

    async fn connect(
        &self,
        room_id: &RoomId,
        _voice_channel_id: &ChannelId,
        _text_channel_id: &ChannelId,
    ) -> Result<Box<dyn PlayerHandle>> {
        self.state.record(EngineCall::Connect {
            room: room_id.clone(),
        });
        self.state.check_available()?;

        Ok(Box::new(FakePlayer {
            room: room_id.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakePlayer {
    room: RoomId,
    state: Arc<FakeState>,
}

#[async_trait]
impl PlayerHandle for FakePlayer {
    async fn play(&self, track: &Track) -> Result<()> {
        self.state.record(EngineCall::Play {
            room: self.room.clone(),
            encoded: track.encoded().to_string(),
        });
        self.state.check_available()?;
        if self.state.playback_failing.load(Ordering::SeqCst) {
            return Err(EngineError::unavailable("fake playback failure"));
        }
        self.state.set_paused(&self.room, false);
        Ok(())
    }

    async fn pause(&self, paused: bool) -> Result<()> {
        self.state.record(EngineCall::Pause {
            room: self.room.clone(),
            paused,
        });
        self.state.check_available()?;
        self.state.set_paused(&self.room, paused);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.state.record(EngineCall::Stop {
            room: self.room.clone(),
        });
        self.state.check_available()
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        self.state.record(EngineCall::SetVolume {
            room: self.room.clone(),
            volume,
        });
        self.state.check_available()
    }

    async fn destroy(&self) -> Result<()> {
        self.state.record(EngineCall::Destroy {
            room: self.room.clone(),
        });
        self.state.check_available()
    }
}

/// Bounded track metadata with every display field filled in
pub fn track_info(id: &str) -> TrackInfo {
    TrackInfo::new(format!("enc-{id}"), format!("Track {id}"))
        .with_author("Test Artist")
        .with_uri(format!("https://example.com/watch?v={id}"))
        .with_duration_ms(180_000)
}

/// Live stream metadata
pub fn stream_info(id: &str) -> TrackInfo {
    TrackInfo::new(format!("enc-{id}"), format!("Stream {id}"))
        .with_author("Test Radio")
        .with_uri(format!("https://example.com/live/{id}"))
        .as_stream()
}

/// `count` bounded tracks named `{prefix}0..{prefix}{count-1}`
pub fn track_infos(prefix: &str, count: usize) -> Vec<TrackInfo> {
    (0..count).map(|i| track_info(&format!("{prefix}{i}"))).collect()
}

/// A queued track requested by user `"requester"`
pub fn queued(id: &str) -> Track {
    Track::new(track_info(id), UserId::new("requester"))
}
