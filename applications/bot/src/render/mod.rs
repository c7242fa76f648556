//! Presentation
//!
//! Pure functions from session snapshots to outbound messages. The bridge
//! turns an [`OutboundMessage`] into whatever the chat platform expects;
//! nothing here knows about the platform's wire format.

pub mod format;
pub mod pagination;
pub mod views;

pub use format::{duration_label, format_duration, DurationSummary};
pub use pagination::{paginate, turn, Page};
pub use views::Renderer;

use cadence_core::ChannelId;
use serde::{Deserialize, Serialize};

/// A message ready for delivery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(default)]
    pub components: Vec<ActionRow>,
    /// Visible only to the user who triggered it
    #[serde(default)]
    pub ephemeral: bool,
    /// 0-based queue page shown; the bridge echoes it back on button presses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: ActionRow) -> Self {
        self.components.push(row);
        self
    }

    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    #[must_use]
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embed {
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Embed {
    pub fn new(color: u32) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn thumbnail(mut self, url: Option<&str>) -> Self {
        self.thumbnail_url = url.map(str::to_string);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A row of buttons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRow {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Danger,
}

/// Where a message goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Target {
    /// Reply to the triggering message or interaction
    Reply,
    /// Reply visible only to the triggering user
    Ephemeral,
    /// Edit the message whose button was pressed
    Update,
    /// Post to a text channel
    Channel { channel_id: ChannelId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub target: Target,
    pub message: OutboundMessage,
}

impl Delivery {
    pub fn reply(message: OutboundMessage) -> Self {
        Self {
            target: Target::Reply,
            message,
        }
    }

    pub fn ephemeral(message: OutboundMessage) -> Self {
        Self {
            target: Target::Ephemeral,
            message: message.ephemeral(),
        }
    }

    pub fn update(message: OutboundMessage) -> Self {
        Self {
            target: Target::Update,
            message,
        }
    }

    pub fn channel(channel_id: ChannelId, message: OutboundMessage) -> Self {
        Self {
            target: Target::Channel { channel_id },
            message,
        }
    }
}
