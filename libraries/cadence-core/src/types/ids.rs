/// ID types for chat-platform entities
///
/// The gateway hands us snowflakes as strings; we never do arithmetic on them,
/// so they stay opaque.
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

opaque_id!(
    /// Room (guild) identifier; one playback session may exist per room
    RoomId
);

opaque_id!(
    /// Voice or text channel identifier
    ChannelId
);

opaque_id!(
    /// Chat user identifier
    UserId
);

opaque_id!(
    /// Identifier of a message already delivered by the gateway
    MessageId
);

impl UserId {
    /// Render as a platform mention
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}
