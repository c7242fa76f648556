//! Engine Events
//!
//! Typed callbacks emitted by an audio node. The bridge forwards them as
//! JSON; the controller feeds room-scoped events through the same per-room
//! serialization as user commands.

use crate::types::{RoomId, TrackInfo};
use serde::{Deserialize, Serialize};

/// Why the engine stopped playing a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackEndReason {
    /// Played to the end
    Finished,
    /// The node could not load the track
    LoadFailed,
    /// Stopped on request (skip / previous)
    Stopped,
    /// Another track was started over it
    Replaced,
    /// The node tore the player down
    Cleanup,
}

impl TrackEndReason {
    /// Whether this ending should move the queue forward
    ///
    /// `Replaced` means a newer play request already took over, and
    /// `Cleanup` means the player is gone; neither may advance.
    pub fn advances_queue(self) -> bool {
        matches!(
            self,
            TrackEndReason::Finished | TrackEndReason::LoadFailed | TrackEndReason::Stopped
        )
    }
}

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    /// A track began playing in a room
    TrackStart {
        /// Room the player belongs to
        room_id: RoomId,
        /// Track that started
        track: TrackInfo,
    },

    /// The current track of a room ended
    TrackEnd {
        /// Room the player belongs to
        room_id: RoomId,
        /// Why it ended
        reason: TrackEndReason,
    },

    /// The engine reports that a room ran out of tracks
    QueueEnd {
        /// Room the player belongs to
        room_id: RoomId,
    },

    /// A node reported an error
    NodeError {
        /// Node name
        node: String,
        /// Error message
        message: String,
    },

    /// A node (re)connected
    NodeConnect {
        /// Node name
        node: String,
        /// Session id assigned by the node, needed for player REST calls
        #[serde(default)]
        session_id: Option<String>,
    },
}

impl EngineEvent {
    /// Room targeted by the event, if it is room-scoped
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            EngineEvent::TrackStart { room_id, .. }
            | EngineEvent::TrackEnd { room_id, .. }
            | EngineEvent::QueueEnd { room_id } => Some(room_id),
            EngineEvent::NodeError { .. } | EngineEvent::NodeConnect { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_natural_endings_advance() {
        assert!(TrackEndReason::Finished.advances_queue());
        assert!(TrackEndReason::LoadFailed.advances_queue());
        assert!(TrackEndReason::Stopped.advances_queue());
        assert!(!TrackEndReason::Replaced.advances_queue());
        assert!(!TrackEndReason::Cleanup.advances_queue());
    }

    #[test]
    fn track_end_wire_format() {
        let event: EngineEvent = serde_json::from_str(
            r#"{"type":"trackEnd","roomId":"55","reason":"finished"}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            EngineEvent::TrackEnd {
                room_id: RoomId::new("55"),
                reason: TrackEndReason::Finished,
            }
        );
        assert_eq!(event.room_id().map(RoomId::as_str), Some("55"));
    }

    #[test]
    fn node_connect_session_is_optional() {
        let event: EngineEvent =
            serde_json::from_str(r#"{"type":"nodeConnect","node":"Main Node"}"#).unwrap();
        assert!(matches!(
            event,
            EngineEvent::NodeConnect { session_id: None, .. }
        ));
        assert!(event.room_id().is_none());
    }
}
