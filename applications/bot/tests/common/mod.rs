//! Common test utilities and fixtures
#![allow(dead_code)]

use cadence_bot::{
    config::BotConfig, dispatcher::Controller, Delivery, InteractionEvent, MessageEvent,
};
use cadence_core::{testing::FakeEngine, ChannelId, MessageId, RoomId, UserId};
use std::sync::Arc;

pub const ROOM: &str = "room-1";
pub const TEXT: &str = "text-1";
pub const VOICE: &str = "voice-1";
pub const USER: &str = "user-1";

/// Valid configuration with default settings
pub fn test_config() -> BotConfig {
    let mut config = BotConfig::default();
    config.node.password = "youshallnotpass".to_string();
    config
}

/// Controller wired to a scriptable engine
pub struct Harness {
    pub controller: Arc<Controller>,
    pub engine: FakeEngine,
}

impl Harness {
    pub fn new(engine: FakeEngine) -> Self {
        Self::with_config(engine, &test_config())
    }

    pub fn with_config(engine: FakeEngine, config: &BotConfig) -> Self {
        let controller = Controller::new(Arc::new(engine.clone()), config).unwrap();
        Self {
            controller: Arc::new(controller),
            engine,
        }
    }

    /// Send `content` as USER from VOICE
    pub async fn say(&self, content: &str) -> Vec<Delivery> {
        self.controller.handle_message(message(content)).await
    }

    pub async fn press(&self, custom_id: &str) -> Vec<Delivery> {
        self.press_on("msg-1", custom_id).await
    }

    pub async fn press_on(&self, message_id: &str, custom_id: &str) -> Vec<Delivery> {
        self.controller
            .handle_interaction(interaction(message_id, custom_id))
            .await
    }

    /// Press a button on a message whose bridge echoed the page it shows
    pub async fn press_on_page(
        &self,
        message_id: &str,
        custom_id: &str,
        page: Option<usize>,
    ) -> Vec<Delivery> {
        let mut event = interaction(message_id, custom_id);
        event.page = page;
        self.controller.handle_interaction(event).await
    }

    pub async fn session_count(&self) -> usize {
        self.controller.registry().len().await
    }
}

pub fn message(content: &str) -> MessageEvent {
    message_from(USER, Some(VOICE), content)
}

pub fn message_from(author: &str, voice: Option<&str>, content: &str) -> MessageEvent {
    MessageEvent {
        room_id: RoomId::new(ROOM),
        channel_id: ChannelId::new(TEXT),
        author_id: UserId::new(author),
        author_is_bot: false,
        author_voice_channel_id: voice.map(ChannelId::new),
        content: content.to_string(),
    }
}

pub fn interaction(message_id: &str, custom_id: &str) -> InteractionEvent {
    InteractionEvent {
        room_id: RoomId::new(ROOM),
        channel_id: ChannelId::new(TEXT),
        message_id: MessageId::new(message_id),
        author_id: UserId::new(USER),
        author_voice_channel_id: Some(ChannelId::new(VOICE)),
        custom_id: custom_id.to_string(),
        page: None,
    }
}

/// Visible text of a delivery: plain content or the embed description
pub fn text(delivery: &Delivery) -> String {
    let message = &delivery.message;
    message
        .content
        .clone()
        .or_else(|| message.embed.as_ref().and_then(|e| e.description.clone()))
        .unwrap_or_default()
}

/// The single delivery of a response
pub fn only(deliveries: &[Delivery]) -> &Delivery {
    assert_eq!(deliveries.len(), 1, "expected one delivery: {deliveries:?}");
    &deliveries[0]
}

pub fn embed_title(delivery: &Delivery) -> Option<String> {
    delivery.message.embed.as_ref().and_then(|e| e.title.clone())
}

pub fn embed_footer(delivery: &Delivery) -> Option<String> {
    delivery.message.embed.as_ref().and_then(|e| e.footer.clone())
}
