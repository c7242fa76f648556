//! Per-room playback state machine
//!
//! A `PlaybackSession` owns the queue, volume, pause flag and player handle
//! for one room. Commands and engine events both mutate it; the caller is
//! expected to hold the session's lock for the duration of each call.
//!
//! Skipping never advances the queue itself: it asks the engine to stop and
//! the resulting track-end event does the advance. That keeps a single path
//! through which the queue moves forward.

use crate::error::{PlaybackError, Result};
use crate::queue::{EnqueueOutcome, Queue, QueueSnapshot};
use crate::types::{LoopMode, PlaybackConfig, SessionState};
use crate::volume::Volume;
use cadence_core::{
    ChannelId, EngineError, PlaybackEngine, PlayerHandle, PlaylistInfo, ResolveResult, RoomId,
    Track, TrackEndReason, TrackInfo, UserId,
};
use tracing::{debug, info, warn};

/// What a resolve result added to the queue
#[derive(Debug, Clone)]
pub enum Added {
    /// One track, at this 1-based pending position
    Track { track: Track, position: usize },

    /// A playlist; `tracks` are the ones that fit
    Playlist {
        info: PlaylistInfo,
        tracks: Vec<Track>,
        dropped: usize,
    },
}

/// Report from [`PlaybackSession::enqueue_resolved`]
#[derive(Debug, Clone)]
pub struct Enqueued {
    pub added: Added,

    /// Playback was started because the session was not already playing
    pub started: Option<Track>,
}

/// What happened after a track ended
#[derive(Debug, Clone)]
pub enum TrackEndOutcome {
    /// Event did not advance the queue (replaced, cleanup, or session gone)
    Ignored,

    /// The next track started
    Next(Track),

    /// Nothing left to play
    QueueEnd(QueueEndOutcome),
}

/// What happened when the queue ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEndOutcome {
    /// Session destroyed; the registry entry must be removed
    Destroyed,

    /// Loop mode kept the session alive
    Kept,

    /// Session was already ended; nothing to report
    AlreadyEnded,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub room_id: RoomId,
    pub voice_channel_id: ChannelId,
    pub text_channel_id: ChannelId,
    pub state: SessionState,
    pub volume: u8,
    pub paused: bool,
    pub queue: QueueSnapshot,
}

/// Playback state for one room
pub struct PlaybackSession {
    room_id: RoomId,
    voice_channel_id: ChannelId,
    text_channel_id: ChannelId,
    queue: Queue,
    volume: u8,
    paused: bool,
    state: SessionState,
    default_volume: u8,
    player: Option<Box<dyn PlayerHandle>>,
}

impl PlaybackSession {
    /// Create a session in `Connecting` state
    pub fn new(
        room_id: RoomId,
        voice_channel_id: ChannelId,
        text_channel_id: ChannelId,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            room_id,
            voice_channel_id,
            text_channel_id,
            queue: Queue::new(config.max_queue_size),
            volume: config.default_volume,
            paused: false,
            state: SessionState::Connecting,
            default_volume: config.default_volume,
            player: None,
        }
    }

    /// Open the engine player and apply the default volume
    ///
    /// A failed volume request is logged and does not fail the connect.
    pub async fn connect(&mut self, engine: &dyn PlaybackEngine) -> Result<()> {
        self.ensure_alive()?;
        if self.player.is_some() {
            return Ok(());
        }

        let player = engine
            .connect(&self.room_id, &self.voice_channel_id, &self.text_channel_id)
            .await?;

        if let Err(e) = player.set_volume(self.default_volume).await {
            warn!(room = %self.room_id, error = %e, "Failed to apply default volume");
        }

        self.player = Some(player);
        self.volume = self.default_volume;
        self.state = SessionState::Idle;
        info!(room = %self.room_id, voice = %self.voice_channel_id, "Player connected");
        Ok(())
    }

    /// Add a resolved result to the queue, starting playback if idle
    ///
    /// Search results contribute only their first entry. When the queue has
    /// room for part of a playlist, the prefix that fits is accepted.
    pub async fn enqueue_resolved(
        &mut self,
        result: ResolveResult,
        requester: &UserId,
    ) -> Result<Enqueued> {
        self.ensure_alive()?;

        let added = match result {
            ResolveResult::NoMatch => return Err(PlaybackError::NoResults),
            ResolveResult::Track { track } => self.enqueue_single(track, requester)?,
            ResolveResult::Search { tracks } => {
                let first = tracks.into_iter().next().ok_or(PlaybackError::NoResults)?;
                self.enqueue_single(first, requester)?
            }
            ResolveResult::Playlist { info, tracks } => {
                if tracks.is_empty() {
                    return Err(PlaybackError::NoResults);
                }
                let tracks: Vec<Track> = tracks
                    .into_iter()
                    .map(|info| Track::new(info, requester.clone()))
                    .collect();
                let EnqueueOutcome { accepted, dropped } =
                    self.queue.enqueue_many(tracks.iter().cloned());
                if accepted == 0 {
                    return Err(PlaybackError::QueueFull {
                        max: self.queue.max_size(),
                    });
                }
                if dropped > 0 {
                    debug!(room = %self.room_id, accepted, dropped, "Playlist truncated to queue capacity");
                }
                Added::Playlist {
                    info,
                    tracks: tracks.into_iter().take(accepted).collect(),
                    dropped,
                }
            }
        };

        let started = if self.state.is_active() {
            None
        } else {
            Some(self.play().await?)
        };

        Ok(Enqueued { added, started })
    }

    fn enqueue_single(&mut self, info: TrackInfo, requester: &UserId) -> Result<Added> {
        let track = Track::new(info, requester.clone());
        let position = self.queue.enqueue(track.clone())?;
        debug!(room = %self.room_id, title = %track.title(), position, "Track queued");
        Ok(Added::Track { track, position })
    }

    /// Start the current track, advancing first if there is none
    ///
    /// On engine failure the session falls back to `Idle` and keeps its queue.
    pub async fn play(&mut self) -> Result<Track> {
        self.ensure_alive()?;

        if self.queue.current().is_none() {
            self.queue.advance();
        }
        let track = self.queue.current().cloned().ok_or(PlaybackError::EmptyQueue)?;

        let result = self.player()?.play(&track).await;
        match result {
            Ok(()) => {
                self.state = SessionState::Playing;
                self.paused = false;
                info!(room = %self.room_id, title = %track.title(), "Playing track");
                Ok(track)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                warn!(room = %self.room_id, title = %track.title(), error = %e, "Engine refused playback");
                Err(e.into())
            }
        }
    }

    /// Pause or resume
    pub async fn pause(&mut self, paused: bool) -> Result<()> {
        self.ensure_alive()?;
        if self.paused == paused {
            return Err(PlaybackError::NoStateChange { paused });
        }

        self.player()?.pause(paused).await?;
        self.paused = paused;
        if self.state.is_active() {
            self.state = if paused {
                SessionState::Paused
            } else {
                SessionState::Playing
            };
        }
        debug!(room = %self.room_id, paused, "Pause state changed");
        Ok(())
    }

    /// Flip pause, returning the new paused flag
    pub async fn toggle_pause(&mut self) -> Result<bool> {
        let paused = !self.paused;
        self.pause(paused).await?;
        Ok(paused)
    }

    /// Move past the current track
    ///
    /// While something is playing the engine is told to stop and its
    /// track-end advances the queue. With nothing playing there is no
    /// track-end to wait for, so the next track starts directly.
    pub async fn skip(&mut self) -> Result<()> {
        self.ensure_alive()?;
        if self.queue.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }
        if self.player.is_none() {
            return Err(not_connected());
        }

        if self.state.is_active() {
            self.player()?.stop().await?;
        } else {
            self.queue.advance();
            self.play().await?;
        }
        debug!(room = %self.room_id, "Skip requested");
        Ok(())
    }

    /// Replay the previous track
    ///
    /// The previous track is put at the head; if something is playing the
    /// engine is told to stop, otherwise playback moves on directly.
    pub async fn previous(&mut self) -> Result<Track> {
        self.ensure_alive()?;
        let previous = self
            .queue
            .previous()
            .cloned()
            .ok_or(PlaybackError::NoPreviousTrack)?;

        if self.player.is_none() {
            return Err(not_connected());
        }

        self.queue.push_front(previous.clone())?;

        if self.state.is_active() {
            let stopped = self.player()?.stop().await;
            if let Err(e) = stopped {
                // Undo so a retry does not queue the track twice
                let _ = self.queue.remove_at(0);
                return Err(e.into());
            }
        } else {
            self.queue.advance();
            self.play().await?;
        }

        debug!(room = %self.room_id, title = %previous.title(), "Returning to previous track");
        Ok(previous)
    }

    /// Set volume from a raw number (0-100)
    pub async fn set_volume(&mut self, level: i64) -> Result<u8> {
        self.ensure_alive()?;
        let volume = Volume::new(level)?.level();
        self.player()?.set_volume(volume).await?;
        self.volume = volume;
        debug!(room = %self.room_id, volume, "Volume changed");
        Ok(volume)
    }

    pub fn set_loop(&mut self, mode: LoopMode) {
        self.queue.set_loop(mode);
    }

    /// Flip loop mode, returning the new one
    pub fn toggle_loop(&mut self) -> LoopMode {
        let mode = self.queue.toggle_loop();
        debug!(room = %self.room_id, ?mode, "Loop mode changed");
        mode
    }

    /// Remove the pending track at a 0-based index
    pub fn remove_at(&mut self, index: usize) -> Result<Track> {
        self.ensure_alive()?;
        self.queue.remove_at(index)
    }

    pub fn shuffle(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.queue.shuffle()
    }

    /// Drop all pending tracks; the current track keeps playing
    pub fn clear_queue(&mut self) -> Result<usize> {
        self.ensure_alive()?;
        if self.queue.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }
        Ok(self.queue.clear())
    }

    /// Release the player and end the session
    ///
    /// Idempotent. Engine failures are logged; the session ends regardless.
    pub async fn destroy(&mut self) {
        if self.state == SessionState::Ended {
            return;
        }

        if let Some(player) = self.player.take() {
            if let Err(e) = player.destroy().await {
                warn!(room = %self.room_id, error = %e, "Failed to destroy player");
            }
        }

        self.queue.reset();
        self.paused = false;
        self.state = SessionState::Ended;
        info!(room = %self.room_id, "Playback session ended");
    }

    /// Engine reported a track started; returns the matching queued track
    pub fn on_track_start(&self, info: &TrackInfo) -> Option<Track> {
        if self.is_ended() {
            return None;
        }
        let current = self.queue.current()?;
        if current.encoded() != info.encoded {
            debug!(room = %self.room_id, "Track start does not match current track");
            return None;
        }
        Some(current.clone())
    }

    /// Engine reported a track ended; advance and play the next one
    pub async fn on_track_end(&mut self, reason: TrackEndReason) -> Result<TrackEndOutcome> {
        if self.is_ended() || !reason.advances_queue() {
            return Ok(TrackEndOutcome::Ignored);
        }

        self.queue.advance();
        if self.queue.current().is_some() {
            let track = self.play().await?;
            Ok(TrackEndOutcome::Next(track))
        } else {
            self.state = SessionState::Idle;
            self.paused = false;
            Ok(TrackEndOutcome::QueueEnd(self.on_queue_end().await))
        }
    }

    /// Queue ran out: destroy unless loop mode keeps the session alive
    pub async fn on_queue_end(&mut self) -> QueueEndOutcome {
        if self.is_ended() {
            return QueueEndOutcome::AlreadyEnded;
        }
        if self.queue.loop_mode() == LoopMode::None && self.queue.is_empty() {
            self.destroy().await;
            QueueEndOutcome::Destroyed
        } else {
            QueueEndOutcome::Kept
        }
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

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ended(&self) -> bool {
        self.state == SessionState::Ended
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.queue.loop_mode()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current(&self) -> Option<&Track> {
        self.queue.current()
    }

    /// Copy out everything a view needs
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            room_id: self.room_id.clone(),
            voice_channel_id: self.voice_channel_id.clone(),
            text_channel_id: self.text_channel_id.clone(),
            state: self.state,
            volume: self.volume,
            paused: self.paused,
            queue: self.queue.snapshot(),
        }
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_ended() {
            Err(PlaybackError::SessionEnded)
        } else {
            Ok(())
        }
    }

    fn player(&self) -> Result<&dyn PlayerHandle> {
        self.player.as_deref().ok_or_else(not_connected)
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("room_id", &self.room_id)
            .field("state", &self.state)
            .field("volume", &self.volume)
            .field("paused", &self.paused)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

fn not_connected() -> PlaybackError {
    PlaybackError::EngineUnavailable(EngineError::unavailable("player not connected"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::testing::{track_info, track_infos, EngineCall, FakeEngine};

    fn config() -> PlaybackConfig {
        PlaybackConfig {
            max_queue_size: 5,
            default_volume: 50,
        }
    }

    async fn connected(engine: &FakeEngine) -> PlaybackSession {
        let mut session = PlaybackSession::new(
            RoomId::new("room"),
            ChannelId::new("voice"),
            ChannelId::new("text"),
            &config(),
        );
        session.connect(engine).await.unwrap();
        session
    }

    fn user() -> UserId {
        UserId::new("user")
    }

    #[tokio::test]
    async fn connect_applies_default_volume() {
        let engine = FakeEngine::new();
        let session = connected(&engine).await;

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.volume(), 50);
        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::Connect {
                    room: RoomId::new("room")
                },
                EngineCall::SetVolume {
                    room: RoomId::new("room"),
                    volume: 50
                },
            ]
        );
    }

    #[tokio::test]
    async fn connect_failure_leaves_connecting() {
        let engine = FakeEngine::new();
        engine.set_unavailable(true);
        let mut session =
            PlaybackSession::new(RoomId::new("r"), ChannelId::new("v"), ChannelId::new("t"), &config());

        let result = session.connect(&engine).await;
        assert!(matches!(result, Err(PlaybackError::EngineUnavailable(_))));
        assert_eq!(session.state(), SessionState::Connecting);
    }

    #[tokio::test]
    async fn first_enqueue_starts_playback() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;

        let report = session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        assert!(matches!(report.added, Added::Track { position: 1, .. }));
        assert_eq!(report.started.unwrap().title(), "Track a");
        assert!(session.is_playing());
        assert!(session.queue().is_empty());
    }

    #[tokio::test]
    async fn enqueue_while_playing_does_not_restart() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        let report = session
            .enqueue_resolved(ResolveResult::Track { track: track_info("b") }, &user())
            .await
            .unwrap();

        assert!(report.started.is_none());
        assert!(matches!(report.added, Added::Track { position: 1, .. }));
    }

    #[tokio::test]
    async fn search_takes_first_result_only() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;

        session
            .enqueue_resolved(
                ResolveResult::Search {
                    tracks: track_infos("s", 3),
                },
                &user(),
            )
            .await
            .unwrap();

        assert_eq!(session.current().unwrap().encoded(), "enc-s0");
        assert!(session.queue().is_empty());
    }

    #[tokio::test]
    async fn empty_results_are_no_results() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;

        for result in [
            ResolveResult::NoMatch,
            ResolveResult::Search { tracks: vec![] },
        ] {
            assert!(matches!(
                session.enqueue_resolved(result, &user()).await,
                Err(PlaybackError::NoResults)
            ));
        }
    }

    #[tokio::test]
    async fn playlist_truncates_to_capacity() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;

        let report = session
            .enqueue_resolved(
                ResolveResult::Playlist {
                    info: PlaylistInfo::new("mix"),
                    tracks: track_infos("p", 8),
                },
                &user(),
            )
            .await
            .unwrap();

        match report.added {
            Added::Playlist { tracks, dropped, .. } => {
                assert_eq!(tracks.len(), 5);
                assert_eq!(dropped, 3);
            }
            Added::Track { .. } => panic!("expected playlist"),
        }
        // First accepted track became current
        assert_eq!(session.queue().len(), 4);
    }

    #[tokio::test]
    async fn engine_refusal_falls_back_to_idle() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        engine.set_playback_failing(true);

        let result = session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await;

        assert!(matches!(result, Err(PlaybackError::EngineUnavailable(_))));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current().unwrap().title(), "Track a");
    }

    #[tokio::test]
    async fn pause_twice_is_no_state_change() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        session.pause(true).await.unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        assert!(matches!(
            session.pause(true).await,
            Err(PlaybackError::NoStateChange { paused: true })
        ));

        assert!(!session.toggle_pause().await.unwrap());
        assert_eq!(session.state(), SessionState::Playing);
        assert!(matches!(
            session.pause(false).await,
            Err(PlaybackError::NoStateChange { paused: false })
        ));
    }

    #[tokio::test]
    async fn skip_stops_without_advancing() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        for id in ["a", "b"] {
            session
                .enqueue_resolved(ResolveResult::Track { track: track_info(id) }, &user())
                .await
                .unwrap();
        }
        engine.clear_calls();

        session.skip().await.unwrap();

        assert_eq!(session.current().unwrap().title(), "Track a");
        assert_eq!(
            engine.calls(),
            vec![EngineCall::Stop {
                room: RoomId::new("room")
            }]
        );
    }

    #[tokio::test]
    async fn skip_with_empty_queue_fails() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        engine.clear_calls();

        assert!(matches!(session.skip().await, Err(PlaybackError::EmptyQueue)));
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.current().unwrap().title(), "Track a");
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn skip_while_idle_starts_next_track() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        engine.set_playback_failing(true);
        for id in ["a", "b"] {
            let result = session
                .enqueue_resolved(ResolveResult::Track { track: track_info(id) }, &user())
                .await;
            assert!(result.is_err());
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current().unwrap().title(), "Track a");
        engine.set_playback_failing(false);
        engine.clear_calls();

        session.skip().await.unwrap();

        assert_eq!(session.current().unwrap().title(), "Track b");
        assert!(session.is_playing());
        assert_eq!(
            engine.calls(),
            vec![EngineCall::Play {
                room: RoomId::new("room"),
                encoded: "enc-b".into()
            }]
        );
    }

    #[tokio::test]
    async fn next_track_starts_unpaused() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        for id in ["a", "b"] {
            session
                .enqueue_resolved(ResolveResult::Track { track: track_info(id) }, &user())
                .await
                .unwrap();
        }
        session.pause(true).await.unwrap();
        assert!(engine.is_paused(&RoomId::new("room")));

        session.on_track_end(TrackEndReason::Finished).await.unwrap();

        assert_eq!(session.state(), SessionState::Playing);
        assert!(!session.is_paused());
        assert!(!engine.is_paused(&RoomId::new("room")));
    }

    #[tokio::test]
    async fn track_end_advances_and_plays() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        for id in ["a", "b"] {
            session
                .enqueue_resolved(ResolveResult::Track { track: track_info(id) }, &user())
                .await
                .unwrap();
        }

        let outcome = session.on_track_end(TrackEndReason::Finished).await.unwrap();
        assert!(matches!(outcome, TrackEndOutcome::Next(ref t) if t.title() == "Track b"));
        assert_eq!(session.queue().previous().unwrap().title(), "Track a");
    }

    #[tokio::test]
    async fn replaced_track_end_is_ignored() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        for reason in [TrackEndReason::Replaced, TrackEndReason::Cleanup] {
            let outcome = session.on_track_end(reason).await.unwrap();
            assert!(matches!(outcome, TrackEndOutcome::Ignored));
        }
        assert_eq!(session.current().unwrap().title(), "Track a");
    }

    #[tokio::test]
    async fn queue_end_destroys_exactly_once() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        let outcome = session.on_track_end(TrackEndReason::Finished).await.unwrap();
        assert!(matches!(
            outcome,
            TrackEndOutcome::QueueEnd(QueueEndOutcome::Destroyed)
        ));
        assert!(session.is_ended());

        assert_eq!(session.on_queue_end().await, QueueEndOutcome::AlreadyEnded);
        assert!(matches!(
            session.on_track_end(TrackEndReason::Finished).await.unwrap(),
            TrackEndOutcome::Ignored
        ));
        let destroys = engine
            .calls()
            .into_iter()
            .filter(|c| matches!(c, EngineCall::Destroy { .. }))
            .count();
        assert_eq!(destroys, 1);
    }

    #[tokio::test]
    async fn loop_queue_keeps_single_track_playing() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();
        session.set_loop(LoopMode::Queue);

        for _ in 0..3 {
            let outcome = session.on_track_end(TrackEndReason::Finished).await.unwrap();
            assert!(matches!(outcome, TrackEndOutcome::Next(ref t) if t.title() == "Track a"));
        }
        assert!(!session.is_ended());
    }

    #[tokio::test]
    async fn previous_requires_history() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        assert!(matches!(
            session.previous().await,
            Err(PlaybackError::NoPreviousTrack)
        ));
    }

    #[tokio::test]
    async fn previous_replays_after_stop() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        for id in ["a", "b"] {
            session
                .enqueue_resolved(ResolveResult::Track { track: track_info(id) }, &user())
                .await
                .unwrap();
        }
        session.on_track_end(TrackEndReason::Finished).await.unwrap();

        let previous = session.previous().await.unwrap();
        assert_eq!(previous.title(), "Track a");
        assert_eq!(session.queue().get(0).unwrap().title(), "Track a");

        session.on_track_end(TrackEndReason::Stopped).await.unwrap();
        assert_eq!(session.current().unwrap().title(), "Track a");
        assert_eq!(session.queue().previous().unwrap().title(), "Track b");
    }

    #[tokio::test]
    async fn volume_bounds() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;

        assert_eq!(session.set_volume(0).await.unwrap(), 0);
        assert_eq!(session.set_volume(100).await.unwrap(), 100);
        assert!(matches!(
            session.set_volume(101).await,
            Err(PlaybackError::InvalidVolume(_))
        ));
        assert!(matches!(
            session.set_volume(-1).await,
            Err(PlaybackError::InvalidVolume(_))
        ));
        assert_eq!(session.volume(), 100);
    }

    #[tokio::test]
    async fn clear_keeps_current_track() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        for id in ["a", "b", "c"] {
            session
                .enqueue_resolved(ResolveResult::Track { track: track_info(id) }, &user())
                .await
                .unwrap();
        }

        assert_eq!(session.clear_queue().unwrap(), 2);
        assert!(matches!(session.clear_queue(), Err(PlaybackError::EmptyQueue)));
        assert!(session.is_playing());
        assert_eq!(session.current().unwrap().title(), "Track a");
    }

    #[tokio::test]
    async fn ended_session_rejects_commands() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session.destroy().await;
        session.destroy().await;

        assert!(matches!(session.play().await, Err(PlaybackError::SessionEnded)));
        assert!(matches!(session.shuffle(), Err(PlaybackError::SessionEnded)));
        assert!(matches!(
            session.set_volume(10).await,
            Err(PlaybackError::SessionEnded)
        ));
    }

    #[tokio::test]
    async fn track_start_matches_current() {
        let engine = FakeEngine::new();
        let mut session = connected(&engine).await;
        session
            .enqueue_resolved(ResolveResult::Track { track: track_info("a") }, &user())
            .await
            .unwrap();

        assert!(session.on_track_start(&track_info("a")).is_some());
        assert!(session.on_track_start(&track_info("zzz")).is_none());
    }
}
