//! Command dispatcher
//!
//! Turns bridge events into session operations and views. Checks that need
//! no session state (voice channel, argument syntax, session existence) run
//! before the room's session guard is taken; everything else runs under the
//! guard, so commands and engine events for one room apply in arrival order.
//!
//! Each handler runs in its own task. A panic inside a handler is logged and
//! answered with a generic error instead of tearing down the request.

use crate::command::{ButtonAction, ButtonKind, Command};
use crate::config::BotConfig;
use crate::error::{DispatchError, DispatchResult, GENERIC_FAILURE};
use crate::inbound::{InteractionEvent, MessageEvent};
use crate::pages::PageStore;
use crate::render::{turn, Delivery, OutboundMessage, Renderer};
use async_trait::async_trait;
use cadence_core::{ChannelId, EngineEvent, PlaybackEngine, RoomId, TrackEndReason, TrackInfo};
use cadence_node_client::LavalinkClient;
use cadence_playback::{
    Added, LoopMode, PlaybackError, PlaybackSession, QueueEndOutcome, SessionRegistry,
    SessionState, SharedSession, TrackEndOutcome, Volume,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const NOTHING_PLAYING: &str = "Nothing is playing!";
const NO_PLAYER: &str = "No active player found!";
const NOT_IN_VOICE: &str = "You must be in a voice channel!";
const WRONG_VOICE: &str = "You must be in the same voice channel as the bot!";
const QUEUE_EMPTY: &str = "Queue is empty! Add some tracks with the play command.";

/// A waiting `play` may find its session ended; it then starts a new one
const PLAY_ATTEMPTS: usize = 3;

/// Receives node session ids announced by node-connect events
#[async_trait]
pub trait NodeSessions: Send + Sync {
    async fn node_connected(&self, node: &str, session_id: &str);
}

#[async_trait]
impl NodeSessions for LavalinkClient {
    async fn node_connected(&self, node: &str, session_id: &str) {
        if node != self.name() {
            debug!(node = %node, configured = %self.name(), "Session id for differently named node");
        }
        self.set_session_id(session_id).await;
    }
}

/// Routes bridge events to playback sessions
pub struct Controller {
    engine: Arc<dyn PlaybackEngine>,
    registry: Arc<SessionRegistry>,
    renderer: Renderer,
    pages: PageStore,
    prefix: String,
    node_sessions: Option<Arc<dyn NodeSessions>>,
}

impl Controller {
    pub fn new(engine: Arc<dyn PlaybackEngine>, config: &BotConfig) -> crate::Result<Self> {
        let renderer = Renderer::new(
            config.embed_color()?,
            config.bot.prefix.clone(),
            config.pagination.items_per_page,
        );

        Ok(Self {
            engine,
            registry: Arc::new(SessionRegistry::new(config.playback_config())),
            renderer,
            pages: PageStore::new(Duration::from_secs(config.pagination.timeout_secs)),
            prefix: config.bot.prefix.clone(),
            node_sessions: None,
        })
    }

    /// Forward node session ids from node-connect events
    #[must_use]
    pub fn with_node_sessions(mut self, sessions: Arc<dyn NodeSessions>) -> Self {
        self.node_sessions = Some(sessions);
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Handle a chat message; unprefixed text and bot authors get no reply
    pub async fn handle_message(self: &Arc<Self>, event: MessageEvent) -> Vec<Delivery> {
        if event.author_is_bot {
            return Vec::new();
        }
        let Some(command) = Command::parse(&self.prefix, &event.content) else {
            return Vec::new();
        };

        let this = Arc::clone(self);
        self.contained(
            command.name(),
            async move { this.run_command(event, command).await },
            |message| vec![Delivery::reply(message)],
        )
        .await
    }

    /// Handle a button press; unknown buttons get no reply
    pub async fn handle_interaction(self: &Arc<Self>, event: InteractionEvent) -> Vec<Delivery> {
        let Some(action) = ButtonAction::parse(&event.custom_id) else {
            debug!(custom_id = %event.custom_id, "Ignoring unknown button");
            return Vec::new();
        };

        let this = Arc::clone(self);
        self.contained(
            action.custom_id(),
            async move { this.run_button(event, action).await },
            |message| vec![Delivery::ephemeral(message)],
        )
        .await
    }

    /// Handle an engine callback
    pub async fn handle_engine_event(self: &Arc<Self>, event: EngineEvent) -> Vec<Delivery> {
        let this = Arc::clone(self);
        self.contained(
            "engine-event",
            async move { this.on_engine_event(event).await },
            |_| Vec::new(),
        )
        .await
    }

    /// Destroy every session, e.g. on shutdown
    pub async fn shutdown(&self) {
        let slots = self.registry.slots().await;
        let count = slots.len();
        for slot in slots {
            let mut session = slot.lock().await;
            self.registry.retire(&slot, &mut session).await;
        }
        info!(sessions = count, "All sessions closed");
    }

    /// Run `task` on its own tokio task so a panic cannot escape
    async fn contained<F>(
        &self,
        label: &'static str,
        task: F,
        on_failure: impl FnOnce(OutboundMessage) -> Vec<Delivery>,
    ) -> Vec<Delivery>
    where
        F: Future<Output = Vec<Delivery>> + Send + 'static,
    {
        match tokio::spawn(task).await {
            Ok(deliveries) => deliveries,
            Err(e) if e.is_panic() => {
                error!(handler = label, "Handler panicked");
                on_failure(self.renderer.error(GENERIC_FAILURE))
            }
            Err(e) => {
                error!(handler = label, error = %e, "Handler task failed");
                on_failure(self.renderer.error(GENERIC_FAILURE))
            }
        }
    }

    // ===== Text commands =====

    async fn run_command(&self, event: MessageEvent, command: Command) -> Vec<Delivery> {
        let name = command.name();
        debug!(room = %event.room_id, author = %event.author_id, command = name, "Command received");

        match self.execute(&event, command).await {
            Ok(deliveries) => deliveries,
            Err(err) => {
                log_failure(name, &event.room_id, &err);
                vec![Delivery::reply(self.renderer.error(&err.user_message()))]
            }
        }
    }

    async fn execute(&self, event: &MessageEvent, command: Command) -> DispatchResult<Vec<Delivery>> {
        if !command.requires_session() {
            return match command {
                Command::Play { query } => self.play(event, &query).await,
                _ => Ok(vec![Delivery::reply(self.renderer.help())]),
            };
        }

        let slot = self.registry.get(&event.room_id).await;
        if command.requires_voice() {
            require_voice(event.author_voice_channel_id.as_ref(), slot.as_ref())?;
        }

        let missing = if command == Command::Status {
            NO_PLAYER
        } else {
            NOTHING_PLAYING
        };
        let slot = slot.ok_or(DispatchError::NoSession(missing))?;

        if let Command::Volume { level } = &command {
            volume_arg(level)?;
        }

        let mut session = slot.lock().await;
        if session.is_ended() {
            return Err(DispatchError::NoSession(missing));
        }
        self.run_locked(&slot, &mut session, command).await
    }

    async fn run_locked(
        &self,
        slot: &SharedSession,
        session: &mut PlaybackSession,
        command: Command,
    ) -> DispatchResult<Vec<Delivery>> {
        let name = command.name();
        let message = match command {
            Command::Pause => {
                session.pause(true).await?;
                self.renderer.success("Paused the music!")
            }
            Command::Resume => {
                session.pause(false).await?;
                self.renderer.success("Resumed the music!")
            }
            Command::Skip => {
                session
                    .skip()
                    .await
                    .map_err(|e| empty_queue_as(e, "No more tracks in queue to skip to!"))?;
                self.renderer.success("Skipped the current track!")
            }
            Command::Stop => {
                self.registry.retire(slot, session).await;
                self.renderer.success("Stopped the music and cleared the queue!")
            }
            Command::Queue { page } => {
                let snapshot = session.queue().snapshot();
                if snapshot.current.is_none() && snapshot.pending.is_empty() {
                    return Err(DispatchError::validation(QUEUE_EMPTY));
                }
                let page = page.unwrap_or(1).saturating_sub(1);
                self.renderer.queue_list(&snapshot, page)
            }
            Command::NowPlaying => {
                let track = session
                    .current()
                    .cloned()
                    .ok_or_else(|| DispatchError::validation("No track is currently playing!"))?;
                self.renderer.now_playing(&track)
            }
            Command::Volume { level } => {
                let level = session.set_volume(volume_arg(&level)?).await?;
                self.renderer.success(&format!("Set volume to {level}%"))
            }
            Command::Shuffle => {
                session.shuffle()?;
                self.renderer.success("Shuffled the queue!")
            }
            Command::Loop => {
                let mode = session.toggle_loop();
                self.renderer.success(&format!("{} loop mode!", loop_verb(mode)))
            }
            Command::Remove { position } => {
                let len = session.queue().len();
                let index = position.filter(|p| (1..=len).contains(p)).ok_or_else(|| {
                    DispatchError::validation(format!(
                        "Please provide a valid track position between 1 and {len}!"
                    ))
                })?;
                let removed = session.remove_at(index - 1)?;
                self.renderer
                    .success(&format!("Removed **{}** from the queue!", removed.title()))
            }
            Command::Clear => {
                session
                    .clear_queue()
                    .map_err(|e| empty_queue_as(e, "Queue is already empty!"))?;
                self.renderer.success("Cleared the queue!")
            }
            Command::Status => self.renderer.player_status(&session.snapshot()),
            Command::Help | Command::Play { .. } => {
                return Err(DispatchError::Internal(format!(
                    "{name} does not run on a locked session"
                )))
            }
        };

        Ok(vec![Delivery::reply(message)])
    }

    async fn play(&self, event: &MessageEvent, query: &str) -> DispatchResult<Vec<Delivery>> {
        let voice = event
            .author_voice_channel_id
            .as_ref()
            .ok_or_else(|| DispatchError::validation(NOT_IN_VOICE))?;

        let query = query.trim();
        if query.is_empty() {
            return Err(DispatchError::validation("Please provide a search query!"));
        }

        for attempt in 1..=PLAY_ATTEMPTS {
            let (slot, created) = self
                .registry
                .get_or_create(&event.room_id, voice.clone(), event.channel_id.clone())
                .await;
            if !created && slot.voice_channel_id() != voice {
                return Err(DispatchError::validation(WRONG_VOICE));
            }

            let mut session = slot.lock().await;
            if session.is_ended() {
                debug!(room = %event.room_id, attempt, "Session ended while waiting, retrying");
                continue;
            }
            return self
                .play_locked(event, query, &slot, &mut session, created)
                .await;
        }

        Err(DispatchError::Internal(format!(
            "no live session for room {} after {PLAY_ATTEMPTS} attempts",
            event.room_id
        )))
    }

    async fn play_locked(
        &self,
        event: &MessageEvent,
        query: &str,
        slot: &SharedSession,
        session: &mut PlaybackSession,
        created: bool,
    ) -> DispatchResult<Vec<Delivery>> {
        if session.state() == SessionState::Connecting {
            if let Err(e) = session.connect(self.engine.as_ref()).await {
                self.registry.retire(slot, session).await;
                return Err(e.into());
            }
        }

        let outcome = match self.engine.resolve(query, &event.author_id).await {
            Ok(result) => session.enqueue_resolved(result, &event.author_id).await,
            Err(e) => Err(PlaybackError::from(e)),
        };

        match outcome {
            Ok(enqueued) => {
                let message = match &enqueued.added {
                    Added::Track { track, position } => {
                        self.renderer.added_to_queue(track, *position)
                    }
                    Added::Playlist {
                        info,
                        tracks,
                        dropped,
                    } => self.renderer.added_playlist(info, tracks, *dropped),
                };
                Ok(vec![Delivery::reply(message)])
            }
            Err(e) => {
                // A session this command opened and never used is not kept around
                if created && session.current().is_none() && session.queue().is_empty() {
                    self.registry.retire(slot, session).await;
                }
                Err(e.into())
            }
        }
    }

    // ===== Buttons =====

    async fn run_button(&self, event: InteractionEvent, action: ButtonAction) -> Vec<Delivery> {
        debug!(room = %event.room_id, author = %event.author_id, button = action.custom_id(), "Button pressed");

        let result = match action.kind() {
            ButtonKind::Help => Ok(vec![Delivery::update(self.renderer.help())]),
            ButtonKind::Page => self.turn_page(&event, action).await,
            ButtonKind::Control => self.control(&event, action).await,
        };

        match result {
            Ok(deliveries) => deliveries,
            Err(err) => {
                log_failure(action.custom_id(), &event.room_id, &err);
                vec![Delivery::ephemeral(self.renderer.notice(&err.user_message()))]
            }
        }
    }

    async fn control(
        &self,
        event: &InteractionEvent,
        action: ButtonAction,
    ) -> DispatchResult<Vec<Delivery>> {
        let slot = self
            .registry
            .get(&event.room_id)
            .await
            .ok_or(DispatchError::NoSession(NO_PLAYER))?;
        let mut session = slot.lock().await;
        if session.is_ended() {
            return Err(DispatchError::NoSession(NO_PLAYER));
        }

        let notice = match action {
            ButtonAction::Previous => {
                session.previous().await?;
                "Playing previous track!".to_string()
            }
            ButtonAction::Pause => {
                if session.toggle_pause().await? {
                    "Paused playback!".to_string()
                } else {
                    "Resumed playback!".to_string()
                }
            }
            ButtonAction::Skip => {
                session
                    .skip()
                    .await
                    .map_err(|e| empty_queue_as(e, "No more tracks in queue!"))?;
                "Skipped current track!".to_string()
            }
            ButtonAction::Loop => format!("{} loop mode!", loop_verb(session.toggle_loop())),
            ButtonAction::Stop => {
                self.registry.retire(&slot, &mut session).await;
                "Stopped playback and cleared queue!".to_string()
            }
            _ => {
                return Err(DispatchError::Internal(format!(
                    "{} is not a player control",
                    action.custom_id()
                )))
            }
        };

        Ok(vec![Delivery::ephemeral(self.renderer.notice(&notice))])
    }

    async fn turn_page(
        &self,
        event: &InteractionEvent,
        action: ButtonAction,
    ) -> DispatchResult<Vec<Delivery>> {
        let slot = self
            .registry
            .get(&event.room_id)
            .await
            .ok_or(DispatchError::NoSession(NO_PLAYER))?;

        let snapshot = {
            let session = slot.lock().await;
            if session.is_ended() {
                return Err(DispatchError::NoSession(NO_PLAYER));
            }
            session.queue().snapshot()
        };
        if snapshot.current.is_none() && snapshot.pending.is_empty() {
            return Err(DispatchError::validation(QUEUE_EMPTY));
        }

        let current = match event.page {
            Some(page) => page,
            None => self.pages.current(&event.message_id).await,
        };
        let total_pages = self
            .renderer
            .queue_page(snapshot.pending.len(), current)
            .total_pages;
        let page = turn(current, action, total_pages);
        self.pages.store(event.message_id.clone(), page).await;

        Ok(vec![Delivery::update(
            self.renderer.queue_list(&snapshot, page),
        )])
    }

    // ===== Engine events =====

    async fn on_engine_event(&self, event: EngineEvent) -> Vec<Delivery> {
        match event {
            EngineEvent::NodeConnect { node, session_id } => {
                info!(node = %node, "Node connected");
                if let (Some(session_id), Some(sessions)) = (session_id, &self.node_sessions) {
                    sessions.node_connected(&node, &session_id).await;
                }
                Vec::new()
            }
            EngineEvent::NodeError { node, message } => {
                error!(node = %node, error = %message, "Node error");
                let notice = self
                    .renderer
                    .error(&format!("Audio node \"{node}\" reported an error: {message}"));
                self.registry
                    .slots()
                    .await
                    .into_iter()
                    .map(|slot| Delivery::channel(slot.text_channel_id().clone(), notice.clone()))
                    .collect()
            }
            EngineEvent::TrackStart { room_id, track } => self.on_track_start(&room_id, &track).await,
            EngineEvent::TrackEnd { room_id, reason } => self.on_track_end(&room_id, reason).await,
            EngineEvent::QueueEnd { room_id } => self.on_queue_end(&room_id).await,
        }
    }

    async fn on_track_start(&self, room_id: &RoomId, track: &TrackInfo) -> Vec<Delivery> {
        let Some(slot) = self.registry.get(room_id).await else {
            debug!(room = %room_id, "Track start for room without session");
            return Vec::new();
        };
        let session = slot.lock().await;
        session
            .on_track_start(track)
            .map(|track| {
                Delivery::channel(
                    slot.text_channel_id().clone(),
                    self.renderer.now_playing(&track),
                )
            })
            .into_iter()
            .collect()
    }

    async fn on_track_end(&self, room_id: &RoomId, reason: TrackEndReason) -> Vec<Delivery> {
        let Some(slot) = self.registry.get(room_id).await else {
            debug!(room = %room_id, ?reason, "Track end for room without session");
            return Vec::new();
        };
        let mut session = slot.lock().await;

        match session.on_track_end(reason).await {
            Ok(TrackEndOutcome::QueueEnd(outcome)) => self.finish_queue(&slot, outcome).await,
            Ok(TrackEndOutcome::Next(track)) => {
                debug!(room = %room_id, title = %track.title(), "Advanced to next track");
                Vec::new()
            }
            Ok(TrackEndOutcome::Ignored) => Vec::new(),
            Err(e) => {
                warn!(room = %room_id, error = %e, "Could not start next track");
                vec![Delivery::channel(
                    slot.text_channel_id().clone(),
                    self.renderer.error(GENERIC_FAILURE),
                )]
            }
        }
    }

    async fn on_queue_end(&self, room_id: &RoomId) -> Vec<Delivery> {
        let Some(slot) = self.registry.get(room_id).await else {
            return Vec::new();
        };
        let mut session = slot.lock().await;
        let outcome = session.on_queue_end().await;
        self.finish_queue(&slot, outcome).await
    }

    /// Must be called while the session guard is held
    async fn finish_queue(&self, slot: &SharedSession, outcome: QueueEndOutcome) -> Vec<Delivery> {
        match outcome {
            QueueEndOutcome::Destroyed => {
                self.registry.remove(slot.room_id(), slot).await;
                vec![Delivery::channel(
                    slot.text_channel_id().clone(),
                    self.renderer.queue_ended(),
                )]
            }
            QueueEndOutcome::Kept | QueueEndOutcome::AlreadyEnded => Vec::new(),
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("prefix", &self.prefix)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Caller's voice channel, which must match the session's when there is one
fn require_voice<'a>(
    voice: Option<&'a ChannelId>,
    slot: Option<&SharedSession>,
) -> DispatchResult<&'a ChannelId> {
    let voice = voice.ok_or_else(|| DispatchError::validation(NOT_IN_VOICE))?;
    match slot {
        Some(slot) if slot.voice_channel_id() != voice => {
            Err(DispatchError::validation(WRONG_VOICE))
        }
        _ => Ok(voice),
    }
}

fn volume_arg(level: &str) -> DispatchResult<i64> {
    let volume: Volume = level.parse()?;
    Ok(i64::from(volume.level()))
}

fn empty_queue_as(err: PlaybackError, message: &str) -> DispatchError {
    match err {
        PlaybackError::EmptyQueue => DispatchError::validation(message),
        other => other.into(),
    }
}

fn loop_verb(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::Queue => "Enabled",
        LoopMode::None => "Disabled",
    }
}

fn log_failure(action: &str, room: &RoomId, err: &DispatchError) {
    if err.is_internal() {
        error!(room = %room, action, error = %err, "Command failed");
    } else {
        debug!(room = %room, action, reason = %err, "Command rejected");
    }
}
