/// Track domain types
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Track metadata as returned by the engine's resolver
///
/// Carries no requester: that is attached when the track is accepted
/// into a queue (see [`Track::new`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    /// Opaque engine token used to start playback
    pub encoded: String,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Author / artist name
    #[serde(default)]
    pub author: String,

    /// Canonical link to the track
    #[serde(default)]
    pub uri: Option<String>,

    /// Track length in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Live stream marker
    #[serde(default)]
    pub is_stream: bool,

    /// Artwork URL
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl TrackInfo {
    /// Create metadata with a title and nothing else
    pub fn new(encoded: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
            title: title.into(),
            author: String::new(),
            uri: None,
            duration_ms: None,
            is_stream: false,
            thumbnail_url: None,
        }
    }

    /// Set the author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the canonical link
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the length in milliseconds
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Mark as a live stream
    #[must_use]
    pub fn as_stream(mut self) -> Self {
        self.is_stream = true;
        self
    }

    /// Set the artwork URL
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Whether the track has no bounded length
    ///
    /// True for explicit streams and for tracks whose length is absent or zero.
    pub fn is_live(&self) -> bool {
        self.is_stream || matches!(self.duration_ms, None | Some(0))
    }

    /// Length of a bounded track, `None` for live ones
    pub fn finite_duration(&self) -> Option<Duration> {
        if self.is_live() {
            None
        } else {
            self.duration_ms.map(Duration::from_millis)
        }
    }
}

/// A track accepted into a queue
///
/// Immutable once built: the requester is stamped exactly once, at enqueue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    info: TrackInfo,
    requester: UserId,
}

impl Track {
    /// Accept resolver metadata on behalf of `requester`
    pub fn new(info: TrackInfo, requester: UserId) -> Self {
        Self { info, requester }
    }

    /// Resolver metadata
    pub fn info(&self) -> &TrackInfo {
        &self.info
    }

    /// User that queued the track
    pub fn requester(&self) -> &UserId {
        &self.requester
    }

    /// Opaque engine token
    pub fn encoded(&self) -> &str {
        &self.info.encoded
    }

    /// Track title
    pub fn title(&self) -> &str {
        &self.info.title
    }

    /// Canonical link, if any
    pub fn uri(&self) -> Option<&str> {
        self.info.uri.as_deref()
    }

    /// See [`TrackInfo::is_live`]
    pub fn is_live(&self) -> bool {
        self.info.is_live()
    }
}
