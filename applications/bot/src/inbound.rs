//! Events posted by the gateway bridge

use cadence_core::{ChannelId, MessageId, RoomId, UserId};
use serde::{Deserialize, Serialize};

/// A chat message seen by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub room_id: RoomId,
    /// Text channel the message was posted in
    pub channel_id: ChannelId,
    pub author_id: UserId,
    #[serde(default)]
    pub author_is_bot: bool,
    /// Voice channel the author is connected to, if any
    #[serde(default)]
    pub author_voice_channel_id: Option<ChannelId>,
    pub content: String,
}

/// A button pressed on one of our messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub room_id: RoomId,
    pub channel_id: ChannelId,
    /// Message carrying the button
    pub message_id: MessageId,
    pub author_id: UserId,
    #[serde(default)]
    pub author_voice_channel_id: Option<ChannelId>,
    pub custom_id: String,
    /// 0-based queue page the message was showing, echoed from
    /// [`crate::render::OutboundMessage::page`]
    #[serde(default)]
    pub page: Option<usize>,
}
